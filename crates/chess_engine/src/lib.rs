pub mod ai;
pub mod board_engine;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod search;
pub mod terminal;
pub mod transposition;

pub use ai::ChessAI;
pub use board_engine::{BoardEngine, MoveGuard, Perspective};
pub use config::{EvalFormula, SearchConfig};
pub use error::{ConfigError, SearchError};
pub use evaluation::{Evaluator, Score, DRAW_SCORE, LOSS_SCORE, WIN_SCORE};
pub use search::{SearchResult, SearchStats};
pub use terminal::{classify, Outcome};
pub use transposition::EvaluationCache;
