use crate::error::{Error, Result};
use crate::reader::Reader;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CpInfo {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    FieldRef(u16, u16),
    MethodRef(u16, u16),
    InterfaceMethodRef(u16, u16),
    NameAndType(u16, u16),
    MethodHandle(u8, u16),
    MethodType(u16),
    Dynamic(u16, u16),
    InvokeDynamic(u16, u16),
    Module(u16),
    Package(u16),
}

impl CpInfo {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            CpInfo::Utf8(_) => "Utf8",
            CpInfo::Integer(_) => "Integer",
            CpInfo::Float(_) => "Float",
            CpInfo::Long(_) => "Long",
            CpInfo::Double(_) => "Double",
            CpInfo::Class(_) => "Class",
            CpInfo::String(_) => "String",
            CpInfo::FieldRef(..) => "Fieldref",
            CpInfo::MethodRef(..) => "Methodref",
            CpInfo::InterfaceMethodRef(..) => "InterfaceMethodref",
            CpInfo::NameAndType(..) => "NameAndType",
            CpInfo::MethodHandle(..) => "MethodHandle",
            CpInfo::MethodType(_) => "MethodType",
            CpInfo::Dynamic(..) => "Dynamic",
            CpInfo::InvokeDynamic(..) => "InvokeDynamic",
            CpInfo::Module(_) => "Module",
            CpInfo::Package(_) => "Package",
        }
    }

    pub(crate) fn tag(&self) -> u8 {
        match self {
            CpInfo::Utf8(_) => 1,
            CpInfo::Integer(_) => 3,
            CpInfo::Float(_) => 4,
            CpInfo::Long(_) => 5,
            CpInfo::Double(_) => 6,
            CpInfo::Class(_) => 7,
            CpInfo::String(_) => 8,
            CpInfo::FieldRef(..) => 9,
            CpInfo::MethodRef(..) => 10,
            CpInfo::InterfaceMethodRef(..) => 11,
            CpInfo::NameAndType(..) => 12,
            CpInfo::MethodHandle(..) => 15,
            CpInfo::MethodType(_) => 16,
            CpInfo::Dynamic(..) => 17,
            CpInfo::InvokeDynamic(..) => 18,
            CpInfo::Module(_) => 19,
            CpInfo::Package(_) => 20,
        }
    }

    /// Long and Double entries occupy two constant pool slots.
    pub(crate) fn is_wide(&self) -> bool {
        matches!(self, CpInfo::Long(_) | CpInfo::Double(_))
    }
}

/// Constant pool indexed the way the class file format indexes it (from 1).
#[derive(Debug, Clone, Default)]
pub(crate) struct ConstantPool {
    entries: Vec<Option<CpInfo>>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(None);
        while entries.len() < count {
            let tag = reader.read_u1()?;
            let info = match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    CpInfo::Utf8(decode_modified_utf8(reader.read_bytes(len)?)?)
                }
                3 => CpInfo::Integer(reader.read_u4()? as i32),
                4 => CpInfo::Float(f32::from_bits(reader.read_u4()?)),
                5 => CpInfo::Long(reader.read_u8()? as i64),
                6 => CpInfo::Double(f64::from_bits(reader.read_u8()?)),
                7 => CpInfo::Class(reader.read_u2()?),
                8 => CpInfo::String(reader.read_u2()?),
                9 => CpInfo::FieldRef(reader.read_u2()?, reader.read_u2()?),
                10 => CpInfo::MethodRef(reader.read_u2()?, reader.read_u2()?),
                11 => CpInfo::InterfaceMethodRef(reader.read_u2()?, reader.read_u2()?),
                12 => CpInfo::NameAndType(reader.read_u2()?, reader.read_u2()?),
                15 => CpInfo::MethodHandle(reader.read_u1()?, reader.read_u2()?),
                16 => CpInfo::MethodType(reader.read_u2()?),
                17 => CpInfo::Dynamic(reader.read_u2()?, reader.read_u2()?),
                18 => CpInfo::InvokeDynamic(reader.read_u2()?, reader.read_u2()?),
                19 => CpInfo::Module(reader.read_u2()?),
                20 => CpInfo::Package(reader.read_u2()?),
                other => return Err(Error::InvalidConstantPoolTag(other)),
            };
            let wide = info.is_wide();
            entries.push(Some(info));
            if wide {
                entries.push(None);
            }
        }
        Ok(Self { entries })
    }

    pub(crate) fn get(&self, index: u16) -> Result<&CpInfo> {
        self.entries
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(Error::InvalidConstantPoolIndex(index))
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            CpInfo::Utf8(value) => Ok(value),
            other => Err(mismatch(index, "Utf8", other)),
        }
    }

    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            CpInfo::Class(name_index) => Ok(self.get_utf8(*name_index)?.to_string()),
            other => Err(mismatch(index, "Class", other)),
        }
    }

    /// Reads a `const_value_index` of an `s` element value, which points
    /// straight at a Utf8 entry.
    pub(crate) fn get_string_constant(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            CpInfo::Utf8(value) => Ok(value.clone()),
            CpInfo::String(utf8) => Ok(self.get_utf8(*utf8)?.to_string()),
            other => Err(mismatch(index, "Utf8", other)),
        }
    }

    /// Interns `info`, returning its index. Used when writing class files.
    pub(crate) fn intern(&mut self, info: CpInfo) -> u16 {
        if self.entries.is_empty() {
            self.entries.push(None);
        }
        if let Some(index) = self
            .entries
            .iter()
            .position(|existing| existing.as_ref() == Some(&info))
        {
            return index as u16;
        }
        let index = self.entries.len() as u16;
        let wide = info.is_wide();
        self.entries.push(Some(info));
        if wide {
            self.entries.push(None);
        }
        index
    }

    pub(crate) fn utf8(&mut self, value: &str) -> u16 {
        self.intern(CpInfo::Utf8(value.to_string()))
    }

    pub(crate) fn class(&mut self, internal_name: &str) -> u16 {
        let name = self.utf8(internal_name);
        self.intern(CpInfo::Class(name))
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        let count = self.entries.len().max(1) as u16;
        out.extend_from_slice(&count.to_be_bytes());
        for info in self.entries.iter().flatten() {
            out.push(info.tag());
            match info {
                CpInfo::Utf8(value) => {
                    let bytes = encode_modified_utf8(value);
                    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
                    out.extend_from_slice(&bytes);
                }
                CpInfo::Integer(v) => out.extend_from_slice(&v.to_be_bytes()),
                CpInfo::Float(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
                CpInfo::Long(v) => out.extend_from_slice(&v.to_be_bytes()),
                CpInfo::Double(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
                CpInfo::MethodHandle(kind, index) => {
                    out.push(*kind);
                    out.extend_from_slice(&index.to_be_bytes());
                }
                CpInfo::Class(a)
                | CpInfo::String(a)
                | CpInfo::MethodType(a)
                | CpInfo::Module(a)
                | CpInfo::Package(a) => out.extend_from_slice(&a.to_be_bytes()),
                CpInfo::FieldRef(a, b)
                | CpInfo::MethodRef(a, b)
                | CpInfo::InterfaceMethodRef(a, b)
                | CpInfo::NameAndType(a, b)
                | CpInfo::Dynamic(a, b)
                | CpInfo::InvokeDynamic(a, b) => {
                    out.extend_from_slice(&a.to_be_bytes());
                    out.extend_from_slice(&b.to_be_bytes());
                }
            }
        }
    }
}

fn mismatch(index: u16, expected: &'static str, found: &CpInfo) -> Error {
    Error::ConstantPoolTypeMismatch {
        index,
        expected,
        found: found.kind(),
    }
}

fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = u16::from(bytes[i]);
        if b0 & 0x80 == 0 {
            if b0 == 0 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push(b0);
            i += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = u16::from(*bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)?);
            units.push(((b0 & 0x1F) << 6) | (b1 & 0x3F));
            i += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = u16::from(*bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)?);
            let b2 = u16::from(*bytes.get(i + 2).ok_or(Error::InvalidModifiedUtf8)?);
            units.push(((b0 & 0x0F) << 12) | ((b1 & 0x3F) << 6) | (b2 & 0x3F));
            i += 3;
        } else {
            return Err(Error::InvalidModifiedUtf8);
        }
    }
    String::from_utf16(&units).map_err(|_| Error::InvalidModifiedUtf8)
}

fn encode_modified_utf8(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | ((unit >> 6) as u8 & 0x1F));
                out.push(0x80 | (unit as u8 & 0x3F));
            }
            _ => {
                out.push(0xE0 | ((unit >> 12) as u8 & 0x0F));
                out.push(0x80 | ((unit >> 6) as u8 & 0x3F));
                out.push(0x80 | (unit as u8 & 0x3F));
            }
        }
    }
    out
}
