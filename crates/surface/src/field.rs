use core_types::FieldId;
use std::collections::HashMap;

/// Persistence target of a widget: the plain field the document is mirrored
/// into.
pub trait BackingStore {
    /// Current value of `field`, if it exists.
    fn value(&self, field: FieldId) -> Option<&str>;

    /// Overwrite the value of `field`, creating it if needed.
    fn write(&mut self, field: FieldId, value: &str);

    /// Remove `field` from view. Its value stays readable.
    fn hide(&mut self, field: FieldId);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackingField {
    pub value: String,
    pub hidden: bool,
}

#[derive(Clone, Debug, Default)]
pub struct FieldStore {
    fields: HashMap<FieldId, BackingField>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    pub fn is_hidden(&self, field: FieldId) -> bool {
        self.fields.get(&field).is_some_and(|f| f.hidden)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field ids in ascending order.
    pub fn ids(&self) -> Vec<FieldId> {
        let mut ids: Vec<_> = self.fields.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl BackingStore for FieldStore {
    fn value(&self, field: FieldId) -> Option<&str> {
        self.fields.get(&field).map(|f| f.value.as_str())
    }

    fn write(&mut self, field: FieldId, value: &str) {
        let entry = self.fields.entry(field).or_default();
        entry.value.clear();
        entry.value.push_str(value);
    }

    fn hide(&mut self, field: FieldId) {
        self.fields.entry(field).or_default().hidden = true;
    }
}
