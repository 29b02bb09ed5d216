use std::borrow::Cow;

use crate::{ClassFileError, Result};

/// Tag of one constant pool slot. `Dummy` marks both slot 0 and the
/// unusable slot that follows every long or double constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTag {
    Dummy,
    Utf8,
    Integer,
    Float,
    Long,
    Double,
    Class,
    String,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    InvokeDynamic,
}

impl EntryTag {
    pub fn name(self) -> &'static str {
        match self {
            EntryTag::Dummy => "Dummy",
            EntryTag::Utf8 => "Utf8",
            EntryTag::Integer => "Integer",
            EntryTag::Float => "Float",
            EntryTag::Long => "Long",
            EntryTag::Double => "Double",
            EntryTag::Class => "Class",
            EntryTag::String => "String",
            EntryTag::FieldRef => "FieldRef",
            EntryTag::MethodRef => "MethodRef",
            EntryTag::InterfaceMethodRef => "InterfaceMethodRef",
            EntryTag::NameAndType => "NameAndType",
            EntryTag::MethodHandle => "MethodHandle",
            EntryTag::MethodType => "MethodType",
            EntryTag::InvokeDynamic => "InvokeDynamic",
        }
    }
}

/// One slot of the constant pool index: which kind of constant lives here,
/// and where its payload sits in the typed pool for that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpEntry {
    pub tag: EntryTag,
    pub slot: usize,
}

/// The contents of a CONSTANT_Utf8 entry, kept as the raw modified UTF-8
/// bytes. The format check inspects individual byte values, so the bytes
/// must survive parsing untouched; conversion to `str` is lossy and meant
/// for names and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utf8Entry {
    bytes: Vec<u8>,
}

impl Utf8Entry {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// The class and name-and-type indices shared by field, method, and
/// interface method references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefInfo {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameAndTypeInfo {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodHandleInfo {
    pub reference_kind: u8,
    pub reference_index: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokeDynamicInfo {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}

/// The constant pool: a 1-indexed table of tagged slots plus one typed pool
/// per constant kind. Slot 0 always holds a `Dummy` sentinel, and after a
/// successful parse the table is exactly `count` slots long.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstantPool {
    count: u16,
    entries: Vec<CpEntry>,
    utf8s: Vec<Utf8Entry>,
    integers: Vec<i32>,
    floats: Vec<f32>,
    longs: Vec<i64>,
    doubles: Vec<f64>,
    class_refs: Vec<u16>,
    string_refs: Vec<u16>,
    field_refs: Vec<RefInfo>,
    method_refs: Vec<RefInfo>,
    interface_method_refs: Vec<RefInfo>,
    name_and_types: Vec<NameAndTypeInfo>,
    method_handles: Vec<MethodHandleInfo>,
    method_types: Vec<u16>,
    invoke_dynamics: Vec<InvokeDynamicInfo>,
}

impl ConstantPool {
    /// Creates an empty pool for the declared `constant_pool_count`,
    /// holding only the slot 0 sentinel.
    pub fn new(count: u16) -> Self {
        Self {
            count,
            entries: vec![CpEntry {
                tag: EntryTag::Dummy,
                slot: 0,
            }],
            ..Self::default()
        }
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn entries(&self) -> &[CpEntry] {
        &self.entries
    }

    /// Random access to one slot of the index, dummy slots included.
    pub fn entry(&self, index: u16) -> Option<CpEntry> {
        self.entries.get(index as usize).copied()
    }

    /// Iterates the usable entries in pool order, skipping dummy slots.
    pub fn iter(&self) -> impl Iterator<Item = (u16, CpEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.tag != EntryTag::Dummy)
            .map(|(i, e)| (i as u16, *e))
    }

    pub fn push_utf8(&mut self, bytes: Vec<u8>) {
        let slot = self.utf8s.len();
        self.utf8s.push(Utf8Entry { bytes });
        self.push_entry(EntryTag::Utf8, slot);
    }

    pub fn push_integer(&mut self, value: i32) {
        let slot = self.integers.len();
        self.integers.push(value);
        self.push_entry(EntryTag::Integer, slot);
    }

    pub fn push_float(&mut self, value: f32) {
        let slot = self.floats.len();
        self.floats.push(value);
        self.push_entry(EntryTag::Float, slot);
    }

    pub fn push_long(&mut self, value: i64) {
        let slot = self.longs.len();
        self.longs.push(value);
        self.push_entry(EntryTag::Long, slot);
    }

    pub fn push_double(&mut self, value: f64) {
        let slot = self.doubles.len();
        self.doubles.push(value);
        self.push_entry(EntryTag::Double, slot);
    }

    pub fn push_class_ref(&mut self, name_index: u16) {
        let slot = self.class_refs.len();
        self.class_refs.push(name_index);
        self.push_entry(EntryTag::Class, slot);
    }

    pub fn push_string_ref(&mut self, string_index: u16) {
        let slot = self.string_refs.len();
        self.string_refs.push(string_index);
        self.push_entry(EntryTag::String, slot);
    }

    pub fn push_field_ref(&mut self, ref_info: RefInfo) {
        let slot = self.field_refs.len();
        self.field_refs.push(ref_info);
        self.push_entry(EntryTag::FieldRef, slot);
    }

    pub fn push_method_ref(&mut self, ref_info: RefInfo) {
        let slot = self.method_refs.len();
        self.method_refs.push(ref_info);
        self.push_entry(EntryTag::MethodRef, slot);
    }

    pub fn push_interface_method_ref(&mut self, ref_info: RefInfo) {
        let slot = self.interface_method_refs.len();
        self.interface_method_refs.push(ref_info);
        self.push_entry(EntryTag::InterfaceMethodRef, slot);
    }

    pub fn push_name_and_type(&mut self, info: NameAndTypeInfo) {
        let slot = self.name_and_types.len();
        self.name_and_types.push(info);
        self.push_entry(EntryTag::NameAndType, slot);
    }

    pub fn push_method_handle(&mut self, info: MethodHandleInfo) {
        let slot = self.method_handles.len();
        self.method_handles.push(info);
        self.push_entry(EntryTag::MethodHandle, slot);
    }

    pub fn push_method_type(&mut self, descriptor_index: u16) {
        let slot = self.method_types.len();
        self.method_types.push(descriptor_index);
        self.push_entry(EntryTag::MethodType, slot);
    }

    pub fn push_invoke_dynamic(&mut self, info: InvokeDynamicInfo) {
        let slot = self.invoke_dynamics.len();
        self.invoke_dynamics.push(info);
        self.push_entry(EntryTag::InvokeDynamic, slot);
    }

    /// Appends the unusable slot that follows a long or double constant.
    pub fn push_dummy(&mut self) {
        self.entries.push(CpEntry {
            tag: EntryTag::Dummy,
            slot: 0,
        });
    }

    fn push_entry(&mut self, tag: EntryTag, slot: usize) {
        self.entries.push(CpEntry { tag, slot });
    }

    pub fn utf8(&self, slot: usize) -> Option<&Utf8Entry> {
        self.utf8s.get(slot)
    }

    pub fn integers(&self) -> &[i32] {
        &self.integers
    }

    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    pub fn longs(&self) -> &[i64] {
        &self.longs
    }

    pub fn doubles(&self) -> &[f64] {
        &self.doubles
    }

    pub fn class_ref(&self, slot: usize) -> Option<u16> {
        self.class_refs.get(slot).copied()
    }

    pub fn string_ref(&self, slot: usize) -> Option<u16> {
        self.string_refs.get(slot).copied()
    }

    pub fn field_ref(&self, slot: usize) -> Option<&RefInfo> {
        self.field_refs.get(slot)
    }

    pub fn method_ref(&self, slot: usize) -> Option<&RefInfo> {
        self.method_refs.get(slot)
    }

    pub fn interface_method_ref(&self, slot: usize) -> Option<&RefInfo> {
        self.interface_method_refs.get(slot)
    }

    pub fn name_and_type(&self, slot: usize) -> Option<&NameAndTypeInfo> {
        self.name_and_types.get(slot)
    }

    pub fn method_handle(&self, slot: usize) -> Option<&MethodHandleInfo> {
        self.method_handles.get(slot)
    }

    pub fn method_type(&self, slot: usize) -> Option<u16> {
        self.method_types.get(slot).copied()
    }

    /// Every invoke-dynamic entry seen in the pool, retained for the pass
    /// that will match them against the BootstrapMethods attribute.
    pub fn invoke_dynamic(&self, slot: usize) -> Option<&InvokeDynamicInfo> {
        self.invoke_dynamics.get(slot)
    }

    pub fn invoke_dynamics(&self) -> &[InvokeDynamicInfo] {
        &self.invoke_dynamics
    }

    /// Looks up the slot at `index`, requiring the index to be in
    /// `[1, count)`.
    pub fn entry_required(&self, index: u16) -> Result<CpEntry> {
        if index == 0 || index >= self.count {
            return Err(ClassFileError::CpIndexOutOfRange { index });
        }
        self.entry(index)
            .ok_or(ClassFileError::CpIndexOutOfRange { index })
    }

    /// Resolves `index` to a UTF8 entry and returns its typed pool slot.
    pub fn utf8_slot_at(&self, index: u16) -> Result<usize> {
        let entry = self.entry_required(index)?;
        if entry.tag != EntryTag::Utf8 {
            return Err(mismatch(index, EntryTag::Utf8, entry.tag));
        }
        if entry.slot >= self.utf8s.len() {
            return Err(ClassFileError::CpIndexOutOfRange { index });
        }
        Ok(entry.slot)
    }

    /// Resolves `index` to a UTF8 entry.
    pub fn utf8_at(&self, index: u16) -> Result<&Utf8Entry> {
        let slot = self.utf8_slot_at(index)?;
        Ok(&self.utf8s[slot])
    }

    /// Resolves `index` to a class reference, returning the index of the
    /// UTF8 entry holding the class name or array descriptor.
    pub fn class_ref_at(&self, index: u16) -> Result<u16> {
        let entry = self.entry_required(index)?;
        if entry.tag != EntryTag::Class {
            return Err(mismatch(index, EntryTag::Class, entry.tag));
        }
        self.class_ref(entry.slot)
            .ok_or(ClassFileError::CpIndexOutOfRange { index })
    }

    /// Resolves `index` to a name-and-type entry.
    pub fn name_and_type_at(&self, index: u16) -> Result<&NameAndTypeInfo> {
        let entry = self.entry_required(index)?;
        if entry.tag != EntryTag::NameAndType {
            return Err(mismatch(index, EntryTag::NameAndType, entry.tag));
        }
        self.name_and_type(entry.slot)
            .ok_or(ClassFileError::CpIndexOutOfRange { index })
    }
}

fn mismatch(index: u16, expected: EntryTag, found: EntryTag) -> ClassFileError {
    ClassFileError::CpVariantMismatch {
        index,
        expected: expected.name(),
        found: found.name(),
    }
}

#[cfg(test)]
mod constant_pool_tests {
    use super::*;

    fn sample_pool() -> ConstantPool {
        let mut pool = ConstantPool::new(5);
        pool.push_utf8(b"java/lang/Object".to_vec());
        pool.push_class_ref(1);
        pool.push_long(42);
        pool.push_dummy();
        pool
    }

    #[test]
    fn it_should_keep_the_index_and_typed_pools_in_step() {
        let pool = sample_pool();
        assert_eq!(pool.entries().len(), 5);
        assert_eq!(
            pool.entry(1),
            Some(CpEntry {
                tag: EntryTag::Utf8,
                slot: 0
            })
        );
        assert_eq!(pool.class_ref(0), Some(1));
        assert_eq!(pool.longs(), &[42]);
    }

    #[test]
    fn it_should_skip_dummy_slots_when_iterating() {
        let pool = sample_pool();
        let tags = pool.iter().map(|(_, e)| e.tag).collect::<Vec<_>>();
        assert_eq!(tags, [EntryTag::Utf8, EntryTag::Class, EntryTag::Long]);
    }

    #[test]
    fn it_should_reject_index_zero_and_out_of_range_indices() {
        let pool = sample_pool();
        assert_eq!(
            pool.entry_required(0),
            Err(ClassFileError::CpIndexOutOfRange { index: 0 })
        );
        assert_eq!(
            pool.entry_required(5),
            Err(ClassFileError::CpIndexOutOfRange { index: 5 })
        );
    }

    #[test]
    fn it_should_report_a_variant_mismatch_on_resolution() {
        let pool = sample_pool();
        assert_eq!(
            pool.utf8_at(2),
            Err(ClassFileError::CpVariantMismatch {
                index: 2,
                expected: "Utf8",
                found: "Class",
            })
        );
    }

    #[test]
    fn it_should_resolve_a_class_reference_to_its_name_index() {
        let pool = sample_pool();
        assert_eq!(pool.class_ref_at(2), Ok(1));
        assert_eq!(pool.utf8_at(1).unwrap().as_bytes(), b"java/lang/Object");
    }
}
