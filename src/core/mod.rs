// Core pipeline exports
pub mod aliases;
pub mod filters;
pub mod interpreter;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod projector;

pub use aliases::{lookup_alias, resolve_city};
pub use filters::{matches_category, matches_city, matches_tags_or_type, PreparedFilter};
pub use interpreter::{build_prompt, parse_filter_response, FilterInterpreter, InterpretationError};
pub use matcher::{MatchEngine, MatchResult};
pub use normalize::{normalize, split_list, DataShapeError};
pub use pipeline::QueryPipeline;
pub use projector::{attribution, project};
