//! Custom class definitions from the `AcDb:Classes` section.
//!
//! Each entry declares an object type beyond the built-in set. Objects of
//! such a type store `500 + index` as their type code.

use crate::io::dwg::constants::CUSTOM_CLASS_BASE;

/// `item_class_id` of classes whose instances are entities.
pub const ENTITY_CLASS_ID: i16 = 0x1F2;

/// `item_class_id` of classes whose instances are non-graphical objects.
pub const OBJECT_CLASS_ID: i16 = 0x1F3;

/// One declared class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DwgClass {
    pub class_number: i16,
    /// Schema version; in R14 and later a proxy capability flag word
    pub version: i16,
    pub app_name: String,
    /// Native (C++) class name, e.g. `AcDbDictionaryWithDefault`
    pub cpp_class_name: String,
    /// Interchange (DXF) class name, e.g. `ACDBDICTIONARYWDFLT`
    pub dxf_name: String,
    pub was_zombie: bool,
    pub item_class_id: i16,
}

impl DwgClass {
    /// Whether instances of this class are graphical entities.
    pub fn is_entity(&self) -> bool {
        self.item_class_id == ENTITY_CLASS_ID
    }
}

/// Ordered list of declared classes. Position matters: it defines the
/// custom type code of each class.
#[derive(Debug, Clone, Default)]
pub struct DwgClassList {
    classes: Vec<DwgClass>,
}

impl DwgClassList {
    pub fn new() -> Self {
        Self { classes: Vec::new() }
    }

    pub fn push(&mut self, class: DwgClass) {
        self.classes.push(class);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DwgClass> {
        self.classes.get(index)
    }

    /// Class for a custom type code (`classes[code - 500]`).
    pub fn by_type_code(&self, code: i16) -> Option<&DwgClass> {
        let index = code.checked_sub(CUSTOM_CLASS_BASE)?;
        usize::try_from(index).ok().and_then(|i| self.classes.get(i))
    }

    /// Find a class by its interchange name, ignoring case.
    pub fn by_dxf_name(&self, dxf_name: &str) -> Option<&DwgClass> {
        self.classes
            .iter()
            .find(|c| c.dxf_name.eq_ignore_ascii_case(dxf_name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DwgClass> {
        self.classes.iter()
    }
}

impl<'a> IntoIterator for &'a DwgClassList {
    type Item = &'a DwgClass;
    type IntoIter = std::slice::Iter<'a, DwgClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list() -> DwgClassList {
        let mut list = DwgClassList::new();
        list.push(DwgClass {
            class_number: 500,
            cpp_class_name: "AcDbDictionaryWithDefault".into(),
            dxf_name: "ACDBDICTIONARYWDFLT".into(),
            item_class_id: OBJECT_CLASS_ID,
            ..Default::default()
        });
        list.push(DwgClass {
            class_number: 501,
            cpp_class_name: "AcDbWipeout".into(),
            dxf_name: "WIPEOUT".into(),
            item_class_id: ENTITY_CLASS_ID,
            ..Default::default()
        });
        list
    }

    #[test]
    fn test_by_type_code() {
        let list = sample_list();
        assert_eq!(list.by_type_code(500).map(|c| c.dxf_name.as_str()), Some("ACDBDICTIONARYWDFLT"));
        assert_eq!(list.by_type_code(501).map(|c| c.cpp_class_name.as_str()), Some("AcDbWipeout"));
        assert!(list.by_type_code(502).is_none());
        assert!(list.by_type_code(0x12).is_none());
        assert!(list.by_type_code(i16::MIN).is_none());
    }

    #[test]
    fn test_is_entity() {
        let list = sample_list();
        assert!(!list.get(0).map_or(true, DwgClass::is_entity));
        assert!(list.by_dxf_name("wipeout").map_or(false, DwgClass::is_entity));
    }
}
