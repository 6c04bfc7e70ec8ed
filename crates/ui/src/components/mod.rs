pub mod footer;
pub mod header;
pub mod modal;
pub mod transcript;

pub use footer::Footer;
pub use header::Header;
pub use modal::ModalView;
pub use transcript::{Transcript, message_spacing};
