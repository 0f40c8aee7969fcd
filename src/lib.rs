mod config;
pub use config::{DEFAULT_FCM_ENDPOINT, DEFAULT_PROJECT_ID, SenderConfig};

mod error;
pub use error::{ErrorKind, Result, SendError};

mod payload;
pub use payload::{IconResolver, NotificationRequest, build_message};

mod sender;
pub use sender::{FcmSender, SendResponse, SendResult};

pub mod google;
