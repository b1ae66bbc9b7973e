//! Punto de entrada ("driver").
//!
//! Este módulo orquesta las fases del análisis y expone una CLI. El
//! archivo de prueba se escoge por número, como `Tests/test0N.tpl`,
//! ya sea desde la línea de comandos o mediante un prompt
//! interactivo. Las cuatro salidas se escriben bajo `TokenStream/`,
//! `SymbolTable/`, `ErrorStream/` y `ParserTrace/`; el archivo de
//! errores se completa en tres pasadas (léxica, sintáctica y
//! semántica), la primera en modo de escritura y las demás en modo
//! de anexado.

use anyhow::Context;
use clap::{crate_version, App, Arg};
use compiler::{
    emit,
    error::{Category, ErrorStream},
    lex::{Lexer, SymbolTable, Token},
    parse::Parser,
};

use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

fn main() -> anyhow::Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    // Parsing de CLI
    let args = App::new("TUPLE compiler front-end")
        .version(crate_version!())
        .arg(
            Arg::new("number")
                .value_name("NUMBER")
                .takes_value(true)
                .help("Test file number; read from Tests/test0<NUMBER>.tpl"),
        )
        .arg(
            Arg::new("root")
                .short('C')
                .long("root")
                .value_name("DIR")
                .takes_value(true)
                .default_value(".")
                .help("Directory holding Tests/ and the output directories"),
        )
        .get_matches();

    let root = PathBuf::from(args.value_of("root").unwrap_or("."));
    let number = match args.value_of("number") {
        Some(number) => number
            .parse()
            .context("The file number must be an integer")?,
        None => prompt_for_number()?,
    };

    let source_path = root.join("Tests").join(format!("test0{}.tpl", number));
    let source = fs::read_to_string(&source_path)
        .with_context(|| format!("Failed to read test file: {}", source_path.display()))?;

    // Fase léxica: una instancia de lexer por línea, compartiendo la
    // tabla de símbolos y acumulando el flujo de tokens completo
    let mut symbols = SymbolTable::new();
    let mut tokens = Vec::new();
    let mut lexical_errors = ErrorStream::new();

    for (line_number, line) in source.split_inclusive('\n').enumerate() {
        let mut lexer = Lexer::new(line, &mut symbols);
        while !lexer.exhausted() {
            let (token, error) = lexer.next_token();
            if let Some(error) = error {
                lexical_errors.record(line_number, error.to_string());
            }

            tokens.push(token);
        }
    }

    info!(
        "lexical analysis: {} tokens, {} symbols, {} errors",
        tokens.len(),
        symbols.len(),
        lexical_errors.len()
    );

    write_artifact(&root, "TokenStream", number, "out", |out| {
        emit::token_stream(out, &tokens)
    })?;
    write_artifact(&root, "SymbolTable", number, "sym", |out| {
        emit::symbol_table(out, &symbols)
    })?;
    write_artifact(&root, "ErrorStream", number, "err", |out| {
        emit::error_stream(out, &lexical_errors, Category::Lexical, true)
    })?;

    // Los tokens que el parser no consume se descartan aquí
    let relevant: Vec<Token> = tokens
        .into_iter()
        .filter(|token| !token.is_discarded())
        .collect();

    let analysis = Parser::new(relevant, &symbols).parse();

    info!(
        "parsing: {} trace entries, {} syntax errors, {} semantic errors",
        analysis.trace.len(),
        analysis.syntax_errors.len(),
        analysis.semantic_errors.len()
    );

    write_artifact(&root, "ParserTrace", number, "tr", |out| {
        emit::parser_trace(out, &analysis.trace)
    })?;
    append_artifact(&root, "ErrorStream", number, "err", |out| {
        emit::error_stream(out, &analysis.syntax_errors, Category::Parsing, false)
    })?;
    append_artifact(&root, "ErrorStream", number, "err", |out| {
        emit::error_stream(out, &analysis.semantic_errors, Category::Semantic, false)
    })?;

    Ok(())
}

/// Pide interactivamente el número de archivo de prueba.
fn prompt_for_number() -> anyhow::Result<u32> {
    print!("Enter the file number: ");
    io::stdout().flush().context("Failed to flush the prompt")?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("Failed to read the file number")?;

    answer
        .trim()
        .parse()
        .context("The file number must be an integer")
}

/// Resuelve la ruta de un artefacto, creando su directorio si hace falta.
fn artifact_path(root: &Path, dir: &str, number: u32, extension: &str) -> anyhow::Result<PathBuf> {
    let dir = root.join(dir);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    Ok(dir.join(format!("test0{}.{}", number, extension)))
}

fn write_artifact<F>(
    root: &Path,
    dir: &str,
    number: u32,
    extension: &str,
    emit: F,
) -> anyhow::Result<()>
where
    F: FnOnce(&mut dyn io::Write) -> io::Result<()>,
{
    let path = artifact_path(root, dir, number, extension)?;
    let mut file = File::create(&path)
        .with_context(|| format!("Failed to open for writing: {}", path.display()))?;

    emit(&mut file).with_context(|| format!("Failed to emit to file: {}", path.display()))
}

fn append_artifact<F>(
    root: &Path,
    dir: &str,
    number: u32,
    extension: &str,
    emit: F,
) -> anyhow::Result<()>
where
    F: FnOnce(&mut dyn io::Write) -> io::Result<()>,
{
    let path = artifact_path(root, dir, number, extension)?;
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .with_context(|| format!("Failed to open for appending: {}", path.display()))?;

    emit(&mut file).with_context(|| format!("Failed to emit to file: {}", path.display()))
}
