pub mod contact;
pub mod format;
pub mod ids;
pub mod name;
pub mod phone;

pub use contact::{Contact, ExtraFields, ParsedContact};
pub use format::FileFormat;
pub use ids::{generate_contact_id, ContactId};
pub use name::{display_name, join_components};
pub use phone::sanitize_phone;
