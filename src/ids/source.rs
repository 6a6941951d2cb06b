use super::error::IdError;
use crate::base::Source;

/// Maps the source of a tree to the id its root is grounded in.
pub trait SourceIdProvider {
    fn source_id(&self, source: &Source) -> Result<String, IdError>;
}

/// File paths with every non-identifier character replaced by `-`;
/// named and synthetic sources as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSourceIdProvider;

impl SourceIdProvider for SimpleSourceIdProvider {
    fn source_id(&self, source: &Source) -> Result<String, IdError> {
        Ok(match source {
            Source::File(path) => sanitize(&path.to_string_lossy()),
            Source::Named(name) => name.clone(),
            Source::Synthetic(uuid) => uuid.to_string(),
        })
    }
}

fn sanitize(path: &str) -> String {
    path.chars()
        .map(|c| if unicode_ident::is_xid_continue(c) { c } else { '-' })
        .collect()
}
