use crate::error::{PgScanError, Result};
use crate::mapping::FieldPath;
use crate::traits::{FieldMut, ScanFields, Slot};
use crate::types::SqlValue;

/// The ordered writable locations of one destination, one per column.
///
/// Row sources decode each column and hand the value to [`Targets::assign`],
/// which walks the column's path (allocating `Option<Box<_>>` fields on the
/// way) and writes through the leaf slot.
pub struct Targets<'a> {
    root: &'a mut dyn ScanFields,
    paths: &'a [FieldPath],
    destination: &'static str,
}

impl<'a> Targets<'a> {
    pub(crate) fn new(
        root: &'a mut dyn ScanFields,
        paths: &'a [FieldPath],
        destination: &'static str,
    ) -> Self {
        Self {
            root,
            paths,
            destination,
        }
    }

    /// Number of columns these targets expect.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Writes `value` into the field mapped to column `index`.
    pub fn assign(&mut self, index: usize, value: SqlValue) -> Result<()> {
        let path = self.paths.get(index).ok_or(PgScanError::ColumnCount {
            expected: self.paths.len(),
            actual: index + 1,
        })?;
        let slot = slot_at(&mut *self.root, path, self.destination)?;
        slot.assign(value).map_err(|e| PgScanError::Decode {
            column: index,
            message: e.to_string(),
        })
    }
}

/// Walks `path` from `node` to a leaf slot.
fn slot_at<'a>(
    mut node: &'a mut dyn ScanFields,
    path: &FieldPath,
    destination: &'static str,
) -> Result<&'a mut dyn Slot> {
    let invalid = || {
        PgScanError::InvalidDestination(format!(
            "field path {:?} does not lead to a value in {}",
            path.indices(),
            destination
        ))
    };

    let (last, parents) = path.indices().split_last().ok_or_else(invalid)?;
    for &index in parents {
        node = match node.field_mut(index) {
            Some(FieldMut::Nested(inner)) => inner,
            _ => return Err(invalid()),
        };
    }
    match node.field_mut(*last) {
        Some(FieldMut::Value(slot)) => Ok(slot),
        _ => Err(invalid()),
    }
}
