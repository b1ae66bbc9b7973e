//! Emisión de los artefactos del análisis.
//!
//! Cada función escribe uno de los cuatro archivos de salida del
//! compilador a un flujo arbitrario. Los anchos fijos de columna y
//! los encabezados son parte del formato y no deben alterarse; el
//! driver es quien decide los destinos concretos y el modo de
//! apertura (el flujo de errores se escribe en tres pasadas, la
//! primera con encabezado y las siguientes en modo de anexado).

use crate::{
    error::{Category, ErrorStream},
    lex::{SymbolTable, Token},
};

use std::io::{self, Write};

/// Emite el flujo de tokens, uno por línea.
pub fn token_stream(output: &mut dyn Write, tokens: &[Token]) -> io::Result<()> {
    for token in tokens {
        writeln!(output, "{}", token)?;
    }

    Ok(())
}

/// Emite la tabla de símbolos léxica en orden de inserción.
pub fn symbol_table(output: &mut dyn Write, symbols: &SymbolTable) -> io::Result<()> {
    writeln!(output, "{:<8} {:<15}", "Key", "Symbol")?;
    for (index, name) in symbols.iter() {
        writeln!(output, "{:<8} {:<15}", index, format!("{}, id", name))?;
    }

    Ok(())
}

/// Emite una pasada del flujo de errores.
///
/// Los números de línea se publican 1-indexados; los contadores
/// internos son 0-indexados.
pub fn error_stream(
    output: &mut dyn Write,
    errors: &ErrorStream,
    category: Category,
    with_header: bool,
) -> io::Result<()> {
    if with_header {
        writeln!(
            output,
            "{:<10} {:<50} {:<20}",
            "<line#>", "<error_found>", "<error_type>"
        )?;
    }

    for (line, message) in errors.iter() {
        writeln!(output, "{:<10} {:<50} {:<20}", line + 1, message, category)?;
    }

    Ok(())
}

/// Emite la traza del parser, una entrada por línea.
pub fn parser_trace(output: &mut dyn Write, trace: &[String]) -> io::Result<()> {
    for entry in trace {
        writeln!(output, "{}", entry)?;
    }

    Ok(())
}
