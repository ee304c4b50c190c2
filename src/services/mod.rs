pub mod clipboard;
pub mod creation_prompt_builder;
pub mod creation_service;
pub mod creation_validator;
pub mod json_sanitizer;
pub mod notifier;
pub mod question_rules;
pub mod revision_prompt_builder;
pub mod revision_service;
pub mod revision_validator;

pub use creation_prompt_builder::build_creation_prompt;
pub use creation_service::{CreationService, SaveTarget};
pub use creation_validator::parse_creation_response;
pub use json_sanitizer::sanitize_llm_json;
pub use notifier::{Notification, NotificationKind, Notifier, ToastCollector};
pub use revision_prompt_builder::build_revision_prompt;
pub use revision_service::RevisionService;
pub use revision_validator::{assign_positional_ids, parse_revision_response};
