//! Prueba de integración de la pipeline completa:
//! lexer -> filtro -> parser -> emisión de artefactos.

use compiler::{
    emit,
    error::{Category, ErrorStream},
    lex::{Lexer, SymbolTable, Token},
    parse::{Analysis, Parser},
};

use std::fs::{self, File, OpenOptions};

/// Corre las fases léxica y sintáctica sobre un fuente en memoria.
fn compile(source: &str) -> (Vec<Token>, SymbolTable, ErrorStream, Analysis) {
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

    let relevant: Vec<Token> = tokens
        .iter()
        .filter(|token| !token.is_discarded())
        .cloned()
        .collect();

    let analysis = Parser::new(relevant, &symbols).parse();
    (tokens, symbols, lexical_errors, analysis)
}

const MIXED_PROGRAM: &str = "int main()\n\
                             {\n\
                             /$ bad comment\n\
                             y = 1;\n\
                             ;\n\
                             }\n";

#[test]
fn error_file_accumulates_three_passes() {
    let (_, _, lexical_errors, analysis) = compile(MIXED_PROGRAM);

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test01.err");

    // Primera pasada en modo de escritura, con encabezado
    let mut file = File::create(&path).expect("create error file");
    emit::error_stream(&mut file, &lexical_errors, Category::Lexical, true).expect("lexical pass");
    drop(file);

    // Pasadas siguientes en modo de anexado
    for (errors, category) in [
        (&analysis.syntax_errors, Category::Parsing),
        (&analysis.semantic_errors, Category::Semantic),
    ] {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .expect("append to error file");
        emit::error_stream(&mut file, errors, category, false).expect("append pass");
    }

    let contents = fs::read_to_string(&path).expect("read error file");
    let lines: Vec<&str> = contents.lines().collect();

    // El encabezado aparece exactamente una vez, al inicio
    assert!(lines[0].starts_with("<line#>"));
    assert_eq!(contents.matches("<line#>").count(), 1);

    // Una fila por categoría, con numeración de líneas 1-indexada
    assert!(contents.contains("Comment not closed properly!"));
    assert!(contents.contains("; cannot be parsed"));
    assert!(contents.contains("Undeclared identifier y"));

    let lexical_row = lines
        .iter()
        .position(|line| line.ends_with("Lexical") || line.trim_end().ends_with("Lexical"))
        .expect("lexical row");
    let parsing_row = lines
        .iter()
        .position(|line| line.trim_end().ends_with("Parsing"))
        .expect("parsing row");
    let semantic_row = lines
        .iter()
        .position(|line| line.trim_end().ends_with("Semantic"))
        .expect("semantic row");

    assert!(lexical_row < parsing_row);
    assert!(parsing_row < semantic_row);

    // "Comment not closed properly!" ocurre en la línea interna 2
    assert!(lines[lexical_row].starts_with("3"));
}

#[test]
fn token_stream_and_symbol_table_files() {
    let (tokens, symbols, _, _) = compile(MIXED_PROGRAM);

    let dir = tempfile::tempdir().expect("temp dir");

    let out_path = dir.path().join("test01.out");
    let mut file = File::create(&out_path).expect("create token stream");
    emit::token_stream(&mut file, &tokens).expect("emit token stream");
    drop(file);

    let contents = fs::read_to_string(&out_path).expect("read token stream");
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("<dt, int>"));
    assert_eq!(lines.next(), Some("<blank>"));
    assert_eq!(lines.next(), Some("<id, 1>"));
    assert!(contents.contains("<Invalid Comment>"));

    let sym_path = dir.path().join("test01.sym");
    let mut file = File::create(&sym_path).expect("create symbol table");
    emit::symbol_table(&mut file, &symbols).expect("emit symbol table");
    drop(file);

    let contents = fs::read_to_string(&sym_path).expect("read symbol table");
    let mut lines = contents.lines();
    assert_eq!(lines.next().map(str::trim_end), Some("Key      Symbol"));
    assert_eq!(lines.next().map(str::trim_end), Some("1        main, id"));
    assert_eq!(lines.next().map(str::trim_end), Some("2        y, id"));
}

#[test]
fn trace_file_ends_with_eof() {
    let (_, _, _, analysis) = compile(MIXED_PROGRAM);

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test01.tr");

    let mut file = File::create(&path).expect("create trace");
    emit::parser_trace(&mut file, &analysis.trace).expect("emit trace");
    drop(file);

    let contents = fs::read_to_string(&path).expect("read trace");
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(lines.first(), Some(&"Scope: 0"));
    assert_eq!(lines.last(), Some(&"EOF"));
    assert!(lines.contains(&"In main()"));
    assert!(lines.contains(&"Exiting main()"));
}

#[test]
fn filtered_stream_keeps_newlines_and_unrecognized() {
    let (tokens, _, _, _) = compile("int a = 1; /$ c $/ @\n");

    let relevant: Vec<&Token> = tokens.iter().filter(|t| !t.is_discarded()).collect();

    assert!(relevant.iter().any(|t| matches!(t, Token::Newline)));
    assert!(relevant.iter().any(|t| matches!(t, Token::Unrecognized)));
    assert!(!relevant.iter().any(|t| matches!(t, Token::Comment)));
    assert!(!relevant.iter().any(|t| matches!(t, Token::Blank)));
}
