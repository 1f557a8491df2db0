// Kernel - infrastructure behind the domain services
//
// Holds the dependency container, the trait seams for outgoing email and
// image hosting, and their production and test implementations.

pub mod deps;
pub mod email;
pub mod test_dependencies;
pub mod traits;
pub mod upload;

pub use deps::{CloudinaryAdapter, ServerDeps};
pub use email::{render_verification_email, EmailService, SmtpMailer};
pub use test_dependencies::TestDependencies;
pub use traits::*;
pub use upload::UploadFileService;
