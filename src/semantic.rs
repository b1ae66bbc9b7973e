//! Análisis semántico.
//!
//! Las verificaciones semánticas están integradas a las acciones del
//! parser; este módulo aporta las piezas sobre las cuales se apoyan:
//! el retículo de tipos aritméticos, la tabla de símbolos de la fase
//! de parsing y las categorías de registro.

use crate::lang::DataType;
use std::fmt::{self, Display};

/// Un tipo resuelto durante el análisis.
///
/// Además de los cuatro tipos declarables, los literales de cadena
/// aportan [`Type::Str`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Bool,
    Char,
    Int,
    Float,
    Str,
}

impl Display for Type {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            Type::Bool => "bool",
            Type::Char => "char",
            Type::Int => "int",
            Type::Float => "float",
            Type::Str => "str",
        };

        fmt.write_str(string)
    }
}

impl From<DataType> for Type {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Bool => Type::Bool,
            DataType::Char => Type::Char,
            DataType::Int => Type::Int,
            DataType::Float => Type::Float,
        }
    }
}

/// Tabla de equivalencia de tipos.
///
/// Define las combinaciones binarias legales `(T1, T2, op) -> T3`
/// sobre los operadores aritméticos, con las promociones
/// convencionales. Una clave ausente significa incompatibilidad.
pub fn equivalence(left: Type, right: Type, op: char) -> Option<Type> {
    use Type::*;

    if !crate::lang::is_arithmetic_op(op) {
        return None;
    }

    match (left, right) {
        (Int, Int) => Some(Int),
        (Float, Float) | (Int, Float) | (Float, Int) => Some(Float),
        (Char, Char) | (Char, Int) | (Int, Char) => Some(Int),
        _ => None,
    }
}

/// Categoría de un registro de la tabla de símbolos.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Function,
    Identifier,
}

impl Kind {
    /// Tamaño asignado a los registros de esta categoría.
    pub fn size(self) -> u32 {
        match self {
            Kind::Function => 2,
            Kind::Identifier => 1,
        }
    }
}

impl Display for Kind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            Kind::Function => "Function",
            Kind::Identifier => "Identifier",
        };

        fmt.write_str(string)
    }
}

/// Un registro de la tabla de símbolos de parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub return_type: Option<Type>,
    pub scope: u32,
    pub size: u32,
}

/// Tabla de símbolos de la fase de parsing.
///
/// Secuencia de registros de inserción única, sin eliminaciones. Las
/// búsquedas exactas se realizan sobre la tripleta (nombre, tipo,
/// alcance); la resolución de tipos sobre (nombre, alcance) con
/// respaldo en el alcance global.
#[derive(Debug, Default)]
pub struct RecordTable {
    records: Vec<Record>,
}

impl RecordTable {
    pub fn new() -> Self {
        RecordTable::default()
    }

    /// Determina si existe un registro exacto (nombre, tipo, alcance).
    pub fn lookup(&self, name: &str, return_type: Option<Type>, scope: u32) -> bool {
        self.records
            .iter()
            .any(|record| {
                record.name == name && record.return_type == return_type && record.scope == scope
            })
    }

    /// Anexa un registro incondicionalmente; quien llama debe haber
    /// consultado [`RecordTable::lookup`] primero.
    pub fn enter(&mut self, name: &str, return_type: Option<Type>, scope: u32, size: u32) {
        self.records.push(Record {
            name: name.to_string(),
            return_type,
            scope,
            size,
        });
    }

    /// Tipo del registro que coincide con (nombre, alcance).
    ///
    /// Si no hay coincidencia en el alcance indicado, se consulta el
    /// alcance global como respaldo.
    pub fn return_type_of(&self, name: &str, scope: u32) -> Option<Type> {
        let exact = self
            .records
            .iter()
            .find(|record| record.name == name && record.scope == scope)
            .and_then(|record| record.return_type);

        exact.or_else(|| {
            if scope == 0 {
                return None;
            }

            self.records
                .iter()
                .find(|record| record.name == name && record.scope == 0)
                .and_then(|record| record.return_type)
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl Display for RecordTable {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            let return_type = match record.return_type {
                Some(typ) => typ.to_string(),
                None => "-".to_string(),
            };

            writeln!(
                fmt,
                "{:<15} {:<8} {:<8} {:<8}",
                record.name, return_type, record.scope, record.size
            )?;
        }

        Ok(())
    }
}
