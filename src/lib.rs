// Library interface for liftrs
// The analyzers are pure; the CLI and integration tests drive them through here.

pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod muscle_recovery;
pub mod plateau;
pub mod progression;
pub mod recovery;
pub mod validation;

// Re-export commonly used types for convenience
pub use models::*;
pub use cache::{AnalyticsCache, CacheMetrics, CacheSettings};
pub use config::AppConfig;
pub use error::{ErrorSeverity, InputError, LiftRsError, Result};
pub use history::{ExerciseHistory, HistoricalSet};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use muscle_recovery::{MuscleRecoveryModel, MuscleRecoveryStatus, MuscleState};
pub use plateau::{PlateauAlert, PlateauConfig, PlateauDetector, PlateauSeverity};
pub use progression::{Confidence, OverloadAdvisor, OverloadConfig, ProgressType, SetRecommendation};
pub use recovery::{OverallRecovery, RecoveryConfig, RecoveryScorer, RecoveryStatus, SuggestedAction};
pub use validation::InputValidator;
