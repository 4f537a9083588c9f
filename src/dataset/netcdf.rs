//! Codec netCDF clássico (CDF-1).
//!
//! Suporta apenas dimensões de tamanho fixo. Na leitura também aceita
//! arquivos com offsets de 64 bits (CDF-2). Todos os inteiros do
//! cabeçalho e dos dados são big-endian, com padding para 4 bytes.

use std::path::Path;

use super::model::{Attribute, Dataset, Dimension, Values, Variable};
use crate::{DecorError, DecorResult};

const MAGIC: &[u8; 3] = b"CDF";
const VERSION_CLASSIC: u8 = 1;
const VERSION_64BIT_OFFSET: u8 = 2;

const NC_DIMENSION: u32 = 0x0A;
const NC_VARIABLE: u32 = 0x0B;
const NC_ATTRIBUTE: u32 = 0x0C;

const NC_BYTE: u32 = 1;
const NC_CHAR: u32 = 2;
const NC_SHORT: u32 = 3;
const NC_INT: u32 = 4;
const NC_FLOAT: u32 = 5;
const NC_DOUBLE: u32 = 6;

const STREAMING: u32 = 0xFFFF_FFFF;

/// Maior offset representável em CDF-1.
const MAX_CLASSIC_OFFSET: usize = i32::MAX as usize;

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn nc_type(values: &Values) -> u32 {
    match values {
        Values::Byte(_) => NC_BYTE,
        Values::Char(_) => NC_CHAR,
        Values::Short(_) => NC_SHORT,
        Values::Int(_) => NC_INT,
        Values::Float(_) => NC_FLOAT,
        Values::Double(_) => NC_DOUBLE,
    }
}

fn type_size(ty: u32) -> Result<usize, String> {
    match ty {
        NC_BYTE | NC_CHAR => Ok(1),
        NC_SHORT => Ok(2),
        NC_INT | NC_FLOAT => Ok(4),
        NC_DOUBLE => Ok(8),
        other => Err(format!("tipo netCDF {} desconhecido", other)),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Escrita
// ═══════════════════════════════════════════════════════════════════════════

/// Serializa um dataset no formato netCDF clássico.
pub fn encode(dataset: &Dataset) -> DecorResult<Vec<u8>> {
    // O tamanho do cabeçalho não depende dos offsets, então basta
    // codificá-lo uma vez com offsets zerados para conhecê-lo.
    let header_len = encode_header(dataset, &vec![0u32; dataset.variables().len()])?.len();

    let mut begins = Vec::with_capacity(dataset.variables().len());
    let mut offset = header_len;
    for var in dataset.variables() {
        if offset > MAX_CLASSIC_OFFSET {
            return Err(DecorError::InvalidDataset(
                "dataset excede o limite de 2 GiB do formato clássico".to_string(),
            ));
        }
        begins.push(offset as u32);
        offset += padded(var.data.len() * var.data.element_size());
    }

    let mut out = encode_header(dataset, &begins)?;
    out.reserve(offset - header_len);
    for var in dataset.variables() {
        write_values(&mut out, &var.data);
    }
    Ok(out)
}

fn encode_header(dataset: &Dataset, begins: &[u32]) -> DecorResult<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.push(VERSION_CLASSIC);
    put_u32(&mut out, 0); // numrecs

    if dataset.dimensions().is_empty() {
        put_absent(&mut out);
    } else {
        put_u32(&mut out, NC_DIMENSION);
        put_len(&mut out, dataset.dimensions().len())?;
        for dim in dataset.dimensions() {
            put_name(&mut out, &dim.name)?;
            put_len(&mut out, dim.len)?;
        }
    }

    put_attributes(&mut out, dataset.attributes())?;

    if dataset.variables().is_empty() {
        put_absent(&mut out);
    } else {
        put_u32(&mut out, NC_VARIABLE);
        put_len(&mut out, dataset.variables().len())?;
        for (var, begin) in dataset.variables().iter().zip(begins) {
            put_name(&mut out, &var.name)?;
            put_len(&mut out, var.dims.len())?;
            for dim in &var.dims {
                let id = dataset
                    .dimensions()
                    .iter()
                    .position(|d| &d.name == dim)
                    .ok_or_else(|| {
                        DecorError::InvalidDataset(format!(
                            "variável '{}' usa dimensão inexistente '{}'",
                            var.name, dim
                        ))
                    })?;
                put_len(&mut out, id)?;
            }
            put_attributes(&mut out, &var.attributes)?;
            put_u32(&mut out, nc_type(&var.data));
            let vsize = padded(var.data.len() * var.data.element_size());
            put_len(&mut out, vsize)?;
            put_u32(&mut out, *begin);
        }
    }

    Ok(out)
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_len(out: &mut Vec<u8>, value: usize) -> DecorResult<()> {
    let value = u32::try_from(value)
        .ok()
        .filter(|v| *v <= i32::MAX as u32)
        .ok_or_else(|| {
            DecorError::InvalidDataset(format!("valor {} excede o formato clássico", value))
        })?;
    put_u32(out, value);
    Ok(())
}

fn put_absent(out: &mut Vec<u8>) {
    put_u32(out, 0);
    put_u32(out, 0);
}

fn put_padding(out: &mut Vec<u8>, written: usize) {
    out.resize(out.len() + padded(written) - written, 0);
}

fn put_name(out: &mut Vec<u8>, name: &str) -> DecorResult<()> {
    put_len(out, name.len())?;
    out.extend_from_slice(name.as_bytes());
    put_padding(out, name.len());
    Ok(())
}

fn put_attributes(out: &mut Vec<u8>, attributes: &[Attribute]) -> DecorResult<()> {
    if attributes.is_empty() {
        put_absent(out);
        return Ok(());
    }
    put_u32(out, NC_ATTRIBUTE);
    put_len(out, attributes.len())?;
    for attr in attributes {
        put_name(out, &attr.name)?;
        put_u32(out, nc_type(&attr.value));
        put_len(out, attr.value.len())?;
        write_values(out, &attr.value);
    }
    Ok(())
}

fn write_values(out: &mut Vec<u8>, values: &Values) {
    match values {
        Values::Byte(v) => out.extend(v.iter().map(|x| *x as u8)),
        Values::Char(v) => out.extend_from_slice(v),
        Values::Short(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes())),
        Values::Int(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes())),
        Values::Float(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes())),
        Values::Double(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_be_bytes())),
    }
    put_padding(out, values.len() * values.element_size());
}

// ═══════════════════════════════════════════════════════════════════════════
// Leitura
// ═══════════════════════════════════════════════════════════════════════════

/// Desserializa bytes netCDF. `origin` identifica a fonte nas mensagens de erro.
pub fn decode(bytes: &[u8], origin: &Path) -> DecorResult<Dataset> {
    Reader::new(bytes)
        .read_dataset()
        .map_err(|reason| DecorError::deserialize(origin, reason))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    version: u8,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            version: VERSION_CLASSIC,
        }
    }

    fn read_dataset(mut self) -> Result<Dataset, String> {
        let magic = self.take(4)?;
        if &magic[..3] != MAGIC {
            return Err("não é um arquivo netCDF (magic inválido)".to_string());
        }
        self.version = magic[3];
        if self.version != VERSION_CLASSIC && self.version != VERSION_64BIT_OFFSET {
            return Err(format!("versão netCDF {} não suportada", self.version));
        }

        let numrecs = self.u32()?;
        if numrecs == STREAMING {
            return Err("arquivos em modo streaming não são suportados".to_string());
        }

        let dimensions = self.read_dimensions()?;
        let attributes = self.read_attributes()?;
        let variables = self.read_variables(&dimensions)?;

        Dataset::from_parts(dimensions, variables, attributes).map_err(|e| e.to_string())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], String> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| format!("arquivo truncado no byte {}", self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32, String> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn len(&mut self) -> Result<usize, String> {
        let value = self.u32()?;
        if value > i32::MAX as u32 {
            return Err(format!("contagem negativa no byte {}", self.pos - 4));
        }
        Ok(value as usize)
    }

    fn offset(&mut self) -> Result<usize, String> {
        if self.version == VERSION_64BIT_OFFSET {
            let b = self.take(8)?;
            let mut raw = [0u8; 8];
            raw.copy_from_slice(b);
            usize::try_from(u64::from_be_bytes(raw)).map_err(|_| "offset grande demais".to_string())
        } else {
            self.len()
        }
    }

    fn skip_padding(&mut self, written: usize) -> Result<(), String> {
        self.take(padded(written) - written).map(|_| ())
    }

    fn name(&mut self) -> Result<String, String> {
        let len = self.len()?;
        let raw = self.take(len)?;
        let name = std::str::from_utf8(raw)
            .map_err(|_| format!("nome inválido (UTF-8) no byte {}", self.pos - len))?
            .to_string();
        self.skip_padding(len)?;
        Ok(name)
    }

    /// Lê o par (tag, nelems), aceitando ABSENT (zero, zero).
    fn list_header(&mut self, expected: u32, what: &str) -> Result<usize, String> {
        let tag = self.u32()?;
        let count = self.len()?;
        match (tag, count) {
            (0, 0) => Ok(0),
            (t, n) if t == expected => Ok(n),
            (t, _) => Err(format!("tag {:#x} inesperada na lista de {}", t, what)),
        }
    }

    fn read_dimensions(&mut self) -> Result<Vec<Dimension>, String> {
        let count = self.list_header(NC_DIMENSION, "dimensões")?;
        let mut dims = Vec::new();
        for _ in 0..count {
            let name = self.name()?;
            let len = self.len()?;
            if len == 0 {
                return Err(format!(
                    "dimensão ilimitada '{}' não é suportada",
                    name
                ));
            }
            dims.push(Dimension { name, len });
        }
        Ok(dims)
    }

    fn read_attributes(&mut self) -> Result<Vec<Attribute>, String> {
        let count = self.list_header(NC_ATTRIBUTE, "atributos")?;
        let mut attrs = Vec::new();
        for _ in 0..count {
            let name = self.name()?;
            let ty = self.u32()?;
            let nelems = self.len()?;
            let value = self.values(ty, nelems)?;
            attrs.push(Attribute { name, value });
        }
        Ok(attrs)
    }

    fn read_variables(&mut self, dimensions: &[Dimension]) -> Result<Vec<Variable>, String> {
        let count = self.list_header(NC_VARIABLE, "variáveis")?;

        // Cabeçalhos primeiro; os dados ficam nos offsets `begin`.
        let mut headers = Vec::new();
        for _ in 0..count {
            let name = self.name()?;
            let ndims = self.len()?;
            let mut dims = Vec::new();
            let mut nelems = 1usize;
            for _ in 0..ndims {
                let id = self.len()?;
                let dim = dimensions
                    .get(id)
                    .ok_or_else(|| format!("variável '{}' referencia dimensão {}", name, id))?;
                nelems = nelems
                    .checked_mul(dim.len)
                    .ok_or_else(|| format!("variável '{}' grande demais", name))?;
                dims.push(dim.name.clone());
            }
            let attributes = self.read_attributes()?;
            let ty = self.u32()?;
            let vsize = self.len()?;
            let expected = nelems
                .checked_mul(type_size(ty)?)
                .map(padded)
                .ok_or_else(|| format!("variável '{}' grande demais", name))?;
            if vsize != expected {
                return Err(format!(
                    "variável '{}' declara {} bytes, esperado {}",
                    name, vsize, expected
                ));
            }
            let begin = self.offset()?;
            headers.push((name, dims, attributes, ty, nelems, begin));
        }

        let mut variables = Vec::with_capacity(headers.len());
        for (name, dims, attributes, ty, nelems, begin) in headers {
            if begin > self.bytes.len() {
                return Err(format!("dados de '{}' fora do arquivo", name));
            }
            self.pos = begin;
            let data = self
                .values(ty, nelems)
                .map_err(|e| format!("variável '{}': {}", name, e))?;
            variables.push(Variable {
                name,
                dims,
                attributes,
                data,
            });
        }
        Ok(variables)
    }

    fn values(&mut self, ty: u32, nelems: usize) -> Result<Values, String> {
        let size = type_size(ty)?;
        let total = nelems
            .checked_mul(size)
            .ok_or_else(|| "array grande demais".to_string())?;
        let raw = self.take(total)?;

        let values = match ty {
            NC_BYTE => Values::Byte(raw.iter().map(|b| *b as i8).collect()),
            NC_CHAR => Values::Char(raw.to_vec()),
            NC_SHORT => Values::Short(
                raw.chunks_exact(2)
                    .map(|c| i16::from_be_bytes([c[0], c[1]]))
                    .collect(),
            ),
            NC_INT => Values::Int(
                raw.chunks_exact(4)
                    .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            NC_FLOAT => Values::Float(
                raw.chunks_exact(4)
                    .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            _ => Values::Double(
                raw.chunks_exact(8)
                    .map(|c| f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                    .collect(),
            ),
        };

        // O padding final dos dados de variáveis pode faltar no fim do arquivo.
        let pad = padded(total) - total;
        if self.pos + pad <= self.bytes.len() {
            self.pos += pad;
        }
        Ok(values)
    }
}
