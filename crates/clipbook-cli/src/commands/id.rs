use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use clipbook_core::domain::{generate_contact_id, ContactId};

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Number of ids to generate
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=10_000))]
    pub count: u32,
}

pub fn generate_ids(ctx: &Context<'_>, args: IdArgs) -> Result<()> {
    let ids: Vec<ContactId> = (0..args.count).map(|_| generate_contact_id()).collect();

    if ctx.json {
        return print_json(&ids);
    }

    for id in ids {
        println!("{id}");
    }
    Ok(())
}
