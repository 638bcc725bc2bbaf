//! Module assessment breakdowns.
//!
//! Weight normalization for graded components and the decoded form of the
//! stored column.

mod error;
mod normalize;
mod stored;

pub use error::AssessmentError;
pub use normalize::{normalize, AssessmentComponent, AssessmentInput, FULL_WEIGHT};
pub use stored::StoredAssessment;
