use crate::domain::model::ParseOutput;
use crate::utils::error::Result;

/// Closed interface implemented by each of the format parsers. Structural
/// validation is cheap and runs before the full parse; both read the file
/// fresh, so neither call depends on the other.
pub trait FileParser {
    fn validate_structure(&self) -> Result<()>;
    fn parse(&self) -> Result<ParseOutput>;
}
