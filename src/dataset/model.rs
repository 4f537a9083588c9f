//! Estrutura em memória de um dataset.

use serde::{Deserialize, Serialize};

use crate::{DecorError, DecorResult};

/// Dimensão nomeada de tamanho fixo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

/// Array tipado: dados de variáveis e valores de atributos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum Values {
    Byte(Vec<i8>),
    Char(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl Values {
    /// Atributo textual.
    pub fn text(s: impl Into<String>) -> Self {
        Values::Char(s.into().into_bytes())
    }

    /// Número de elementos.
    pub fn len(&self) -> usize {
        match self {
            Values::Byte(v) => v.len(),
            Values::Char(v) => v.len(),
            Values::Short(v) => v.len(),
            Values::Int(v) => v.len(),
            Values::Float(v) => v.len(),
            Values::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tamanho de um elemento em bytes.
    pub fn element_size(&self) -> usize {
        match self {
            Values::Byte(_) | Values::Char(_) => 1,
            Values::Short(_) => 2,
            Values::Int(_) | Values::Float(_) => 4,
            Values::Double(_) => 8,
        }
    }

    /// Nome do tipo, como exibido pela CLI.
    pub fn type_name(&self) -> &'static str {
        match self {
            Values::Byte(_) => "byte",
            Values::Char(_) => "char",
            Values::Short(_) => "short",
            Values::Int(_) => "int",
            Values::Float(_) => "float",
            Values::Double(_) => "double",
        }
    }

    /// Conteúdo textual de um array `Char`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Values::Char(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// Elementos convertidos para f64 (`None` para texto).
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            Values::Byte(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            Values::Char(_) => None,
            Values::Short(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            Values::Int(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            Values::Float(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            Values::Double(v) => Some(v.clone()),
        }
    }
}

/// Atributo nomeado (global ou de variável).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: Values,
}

/// Variável: array n-dimensional sobre dimensões do dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// Nomes das dimensões, da mais lenta para a mais rápida.
    pub dims: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    pub data: Values,
}

impl Variable {
    /// Busca um atributo da variável.
    pub fn attribute(&self, name: &str) -> Option<&Values> {
        find_attribute(&self.attributes, name)
    }
}

/// Resultado persistível: dimensões, variáveis e atributos globais.
///
/// A ordem de inserção é preservada e faz parte da igualdade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    dimensions: Vec<Dimension>,
    variables: Vec<Variable>,
    attributes: Vec<Attribute>,
}

impl Dataset {
    /// Cria um dataset vazio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona uma dimensão de tamanho fixo.
    pub fn add_dimension(&mut self, name: impl Into<String>, len: usize) -> DecorResult<()> {
        let name = name.into();
        validate_name(&name)?;
        if len == 0 {
            return Err(DecorError::InvalidDataset(format!(
                "dimensão '{}' tem tamanho zero",
                name
            )));
        }
        if self.dimension(&name).is_some() {
            return Err(DecorError::InvalidDataset(format!(
                "dimensão '{}' já existe",
                name
            )));
        }
        self.dimensions.push(Dimension { name, len });
        Ok(())
    }

    /// Adiciona uma variável sobre dimensões já declaradas.
    ///
    /// O número de elementos de `data` deve ser o produto dos tamanhos
    /// das dimensões (1 para escalares).
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        dims: &[&str],
        data: Values,
    ) -> DecorResult<()> {
        let name = name.into();
        validate_name(&name)?;
        if self.variable(&name).is_some() {
            return Err(DecorError::InvalidDataset(format!(
                "variável '{}' já existe",
                name
            )));
        }

        let mut expected = 1usize;
        for dim in dims {
            let d = self.dimension(dim).ok_or_else(|| {
                DecorError::InvalidDataset(format!(
                    "variável '{}' usa dimensão inexistente '{}'",
                    name, dim
                ))
            })?;
            expected = expected.checked_mul(d.len).ok_or_else(|| {
                DecorError::InvalidDataset(format!("variável '{}' grande demais", name))
            })?;
        }

        if data.len() != expected {
            return Err(DecorError::InvalidDataset(format!(
                "variável '{}' espera {} elementos, recebeu {}",
                name,
                expected,
                data.len()
            )));
        }

        self.variables.push(Variable {
            name,
            dims: dims.iter().map(|d| d.to_string()).collect(),
            attributes: Vec::new(),
            data,
        });
        Ok(())
    }

    /// Define (ou substitui) um atributo global.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Values) -> DecorResult<()> {
        let name = name.into();
        validate_name(&name)?;
        upsert_attribute(&mut self.attributes, name, value);
        Ok(())
    }

    /// Define (ou substitui) um atributo de uma variável existente.
    pub fn set_variable_attribute(
        &mut self,
        variable: &str,
        name: impl Into<String>,
        value: Values,
    ) -> DecorResult<()> {
        let name = name.into();
        validate_name(&name)?;
        let var = self
            .variables
            .iter_mut()
            .find(|v| v.name == variable)
            .ok_or_else(|| {
                DecorError::InvalidDataset(format!("variável '{}' não existe", variable))
            })?;
        upsert_attribute(&mut var.attributes, name, value);
        Ok(())
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Values> {
        find_attribute(&self.attributes, name)
    }

    /// Verdadeiro quando não há dimensões, variáveis nem atributos.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.variables.is_empty() && self.attributes.is_empty()
    }

    /// Monta um dataset a partir de partes decodificadas, com as mesmas
    /// validações de `add_dimension` e `add_variable`.
    pub(crate) fn from_parts(
        dimensions: Vec<Dimension>,
        variables: Vec<Variable>,
        attributes: Vec<Attribute>,
    ) -> DecorResult<Self> {
        let mut ds = Self::new();
        for dim in dimensions {
            ds.add_dimension(dim.name, dim.len)?;
        }
        for var in variables {
            let dims: Vec<&str> = var.dims.iter().map(String::as_str).collect();
            ds.add_variable(var.name.as_str(), &dims, var.data)?;
            check_attributes(&var.attributes, &var.name)?;
            if let Some(last) = ds.variables.last_mut() {
                last.attributes = var.attributes;
            }
        }
        check_attributes(&attributes, "globais")?;
        ds.attributes = attributes;
        Ok(ds)
    }
}

fn validate_name(name: &str) -> DecorResult<()> {
    if name.is_empty() {
        return Err(DecorError::InvalidDataset("nome vazio".to_string()));
    }
    if name.contains('/') || name.contains('\0') {
        return Err(DecorError::InvalidDataset(format!(
            "nome '{}' contém caractere inválido",
            name
        )));
    }
    Ok(())
}

/// Nomes válidos e sem repetição.
fn check_attributes(attributes: &[Attribute], owner: &str) -> DecorResult<()> {
    for (i, attr) in attributes.iter().enumerate() {
        validate_name(&attr.name)?;
        if attributes[..i].iter().any(|a| a.name == attr.name) {
            return Err(DecorError::InvalidDataset(format!(
                "atributo '{}' repetido em {}",
                attr.name, owner
            )));
        }
    }
    Ok(())
}

fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Values> {
    attributes.iter().find(|a| a.name == name).map(|a| &a.value)
}

fn upsert_attribute(attributes: &mut Vec<Attribute>, name: String, value: Values) {
    match attributes.iter_mut().find(|a| a.name == name) {
        Some(existing) => existing.value = value,
        None => attributes.push(Attribute { name, value }),
    }
}
