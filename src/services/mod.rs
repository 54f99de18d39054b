//! Business logic services.

pub mod e2e_report;
pub mod event_broadcaster;
pub mod manual_runs;
pub mod pubsub;
pub mod report_consumer;

pub use event_broadcaster::EventBroadcaster;
pub use pubsub::{PubSub, REPORT_GENERATE_CHANNEL};
pub use report_consumer::{ReportConsumer, start_report_consumer};
