//! Initializers for pages without a content listing.

pub mod about;
pub mod contact;

pub use about::init_about;
pub use contact::init_contact_form;
