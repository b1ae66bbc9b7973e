//! Análisis léxico.
//!
//! # Tokenization
//! Esta es la primera fase del compilador. Descompone una línea del
//! programa fuente en unidades léxicas denominadas tokens. El lexer
//! se construye por línea: el driver lo reinstancia para cada línea
//! del archivo, compartiendo una misma tabla de símbolos entre todas
//! las instancias. Un centinela `'\n'` se anexa internamente, por lo
//! cual leer más allá del final produce el carácter NUL.
//!
//! # Contenido de un token
//! Los tokens son una unión discriminada; la forma textual con
//! corchetes angulares (`<dt, int>`, `<id, 3>`, `<+>`) se produce
//! únicamente en la frontera de salida a través de [`Display`]. Los
//! identificadores no llevan su lexema sino el índice que les fue
//! asignado en la tabla de símbolos; las constantes numéricas
//! preservan su cadena de dígitos tal como aparece en el fuente.
//!
//! # Errores
//! El lexer nunca falla ni se detiene: toda condición inválida se
//! reporta como una variante de token inválido junto a un
//! [`LexicalError`] paralelo, y el escaneo continúa en el siguiente
//! carácter. Los escaneos internos se detienen siempre al final de la
//! línea, de modo que cada línea produce una secuencia finita.

use crate::lang::{self, DataType, Keyword, RelOp};
use std::fmt::{self, Display};

use thiserror::Error;

/// Carácter centinela más allá del final de la línea.
const NUL: char = '\0';

/// Error de escaneo.
///
/// Estos errores no interrumpen la tokenización; se acumulan en el
/// flujo de errores de la categoría léxica.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    /// Comentario de bloque sin su `$/` de cierre en la misma línea.
    #[error("Comment not closed properly!")]
    UnclosedComment,

    /// Un identificador continuado por un carácter que no lo termina.
    #[error("{0} (Invalid Identifier!)")]
    InvalidIdentifier(String),

    /// Constante con punto decimal que no satisface `digitos.digitos(E digitos)?`.
    #[error("{0} (Invalid Float!)")]
    InvalidFloat(String),

    /// Constante de carácter cuyo contenido no es exactamente un carácter.
    #[error("{0} (Invalid char constant!)")]
    InvalidCharConstant(String),

    /// Dígito seguido inmediatamente por una letra.
    #[error("Unsupported character found with digit!")]
    DigitWithLetter,

    /// Carácter que no pertenece a ninguna categoría del lenguaje.
    #[error("<Character not recognised!>")]
    Unrecognized,
}

/// Objeto resultante del análisis léxico.
///
/// La forma textual de cada variante es parte del formato de salida
/// del compilador y se produce mediante [`Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<keyword, if>`
    Keyword(Keyword),

    /// `<dt, int>`
    DataType(DataType),

    /// `<id, 3>`; el índice refiere a la tabla de símbolos léxica.
    Id(usize),

    /// `<num, 42>`, incluyendo literales con signo como `<num, -7>`.
    Num(String),

    /// `<float, 3.14E5>`
    Float(String),

    /// `<char_constant, a>`
    CharConst(char),

    /// `<literal, hello>`
    Literal(String),

    /// `<+>`, `<->`, `<*>`, `</>`, `<^>`
    ArithOp(char),

    /// `<assign, =>`
    Assign,

    /// `<rel_op, LE>`
    RelOp(RelOp),

    /// `<punctuator, ;>`
    Punct(char),

    /// `<blank>`
    Blank,

    /// `<tab>`
    Tab,

    /// `<newline>`
    Newline,

    /// `<Comment>`
    Comment,

    /// `<Invalid Comment>`
    InvalidComment,

    /// `<Invalid Identifier!>`
    InvalidId,

    /// `<Invalid Float!>`
    InvalidFloat,

    /// `<Invalid char constant!, ab>`
    InvalidChar(String),

    /// `<Unsupported character>`
    Unsupported,

    /// `<Character not recognised!>`
    Unrecognized,
}

impl Token {
    /// Atributo del token: la mitad derecha de su forma textual.
    ///
    /// Los tokens de dos partes (`<dt, int>`) tienen atributo; los de
    /// una sola parte (`<+>`, `<blank>`) no. La recuperación de pánico
    /// del parser distingue ambos casos.
    pub fn attribute(&self) -> Option<String> {
        use Token::*;

        match self {
            Keyword(keyword) => Some(keyword.to_string()),
            DataType(data_type) => Some(data_type.to_string()),
            Id(index) => Some(index.to_string()),
            Num(digits) => Some(digits.clone()),
            Float(digits) => Some(digits.clone()),
            CharConst(c) => Some(c.to_string()),
            Literal(text) => Some(text.clone()),
            Assign => Some("=".to_string()),
            RelOp(op) => Some(op.to_string()),
            Punct(c) => Some(c.to_string()),
            InvalidChar(text) => Some(text.clone()),
            ArithOp(_) | Blank | Tab | Newline | Comment | InvalidComment | InvalidId
            | InvalidFloat | Unsupported | Unrecognized => None,
        }
    }

    /// Determina si el token se descarta antes del análisis sintáctico.
    ///
    /// Comentarios, espacios horizontales y toda variante inválida no
    /// llegan al parser. Los tokens `<newline>` sí llegan: el parser
    /// los utiliza para llevar la cuenta de líneas.
    pub fn is_discarded(&self) -> bool {
        use Token::*;

        matches!(
            self,
            Comment | Blank | Tab | InvalidComment | InvalidId | InvalidFloat | InvalidChar(_)
        )
    }
}

impl Display for Token {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Token::*;

        match self {
            Keyword(keyword) => write!(fmt, "<keyword, {}>", keyword),
            DataType(data_type) => write!(fmt, "<dt, {}>", data_type),
            Id(index) => write!(fmt, "<id, {}>", index),
            Num(digits) => write!(fmt, "<num, {}>", digits),
            Float(digits) => write!(fmt, "<float, {}>", digits),
            CharConst(c) => write!(fmt, "<char_constant, {}>", c),
            Literal(text) => write!(fmt, "<literal, {}>", text),
            ArithOp(op) => write!(fmt, "<{}>", op),
            Assign => fmt.write_str("<assign, =>"),
            RelOp(op) => write!(fmt, "<rel_op, {}>", op),
            Punct(c) => write!(fmt, "<punctuator, {}>", c),
            Blank => fmt.write_str("<blank>"),
            Tab => fmt.write_str("<tab>"),
            Newline => fmt.write_str("<newline>"),
            Comment => fmt.write_str("<Comment>"),
            InvalidComment => fmt.write_str("<Invalid Comment>"),
            InvalidId => fmt.write_str("<Invalid Identifier!>"),
            InvalidFloat => fmt.write_str("<Invalid Float!>"),
            InvalidChar(text) => write!(fmt, "<Invalid char constant!, {}>", text),
            Unsupported => fmt.write_str("<Unsupported character>"),
            Unrecognized => fmt.write_str("<Character not recognised!>"),
        }
    }
}

/// Tabla de símbolos léxica.
///
/// Asocia cada identificador del programa con un índice entero denso
/// que comienza en 1. El orden de inserción es el orden de primera
/// aparición en el fuente; no hay eliminaciones y la unicidad se
/// garantiza con una búsqueda lineal previa a cada inserción.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Busca un identificador, insertándolo si aún no está registrado.
    /// Retorna su índice estable.
    pub fn intern(&mut self, name: &str) -> usize {
        match self.names.iter().position(|known| known == name) {
            Some(position) => position + 1,
            None => {
                self.names.push(name.to_string());
                self.names.len()
            }
        }
    }

    /// Nombre registrado bajo un índice, si el índice es válido.
    pub fn name(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|position| self.names.get(position))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Itera `(índice, nombre)` en orden de inserción.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(position, name)| (position + 1, name.as_str()))
    }
}

/// Máquina de estados para análisis léxico de una línea.
///
/// El lexer mantiene un cursor sobre la línea y despacha sobre el
/// carácter actual hacia el sub-autómata correspondiente. La
/// operación [`Lexer::next_token`] produce el siguiente token junto
/// con un posible error léxico asociado.
pub struct Lexer<'t> {
    input: Vec<char>,
    pos: usize,
    cur: char,
    symbols: &'t mut SymbolTable,
}

impl<'t> Lexer<'t> {
    /// Crea un lexer sobre una línea del fuente.
    ///
    /// El centinela se anexa incondicionalmente después de la línea.
    /// Una línea que conserva su `'\n'` emite exactamente un token
    /// `<newline>`; una línea final sin terminador no emite ninguno,
    /// ya que el carácter anexado nunca se tokeniza.
    pub fn new(line: &str, symbols: &'t mut SymbolTable) -> Self {
        let mut input: Vec<char> = line.chars().collect();
        input.push('\n');

        let cur = input[0];

        Lexer {
            input,
            pos: 0,
            cur,
            symbols,
        }
    }

    /// Determina si la línea fue consumida por completo.
    ///
    /// El bucle de tokenización corre mientras el lookahead no sea el
    /// centinela; como la condición se evalúa antes de consumir, el
    /// carácter anexado nunca se tokeniza.
    pub fn exhausted(&self) -> bool {
        self.peek() == NUL
    }

    fn advance(&mut self, step: usize) {
        self.pos += step;
        self.cur = self.input.get(self.pos).copied().unwrap_or(NUL);
    }

    fn peek(&self) -> char {
        self.input.get(self.pos + 1).copied().unwrap_or(NUL)
    }

    /// Produce el siguiente token de la línea.
    pub fn next_token(&mut self) -> (Token, Option<LexicalError>) {
        match self.cur {
            '/' => self.comment_or_division(),
            c if lang::is_letter(c) => self.keyword_data_type_or_id(),
            c if c.is_ascii_digit() => self.number(),
            c if lang::is_arithmetic_op(c) => self.arithmetic_op(),
            '=' => self.assign_or_eq(),
            '<' | '>' => (Token::RelOp(self.relational()), None),
            '!' => self.negated_relational(),
            '"' => (self.string_literal(), None),
            '\'' => self.char_constant(),
            c if lang::is_punctuation(c) => {
                self.advance(1);
                (Token::Punct(c), None)
            }
            ' ' => {
                self.advance(1);
                (Token::Blank, None)
            }
            '\t' => {
                self.advance(1);
                (Token::Tab, None)
            }
            '\n' => {
                self.advance(1);
                (Token::Newline, None)
            }
            _ => {
                self.advance(1);
                (Token::Unrecognized, Some(LexicalError::Unrecognized))
            }
        }
    }

    /// Sub-autómata para `/`: comentario de bloque `/$ ... $/` o
    /// el operador de división.
    fn comment_or_division(&mut self) -> (Token, Option<LexicalError>) {
        if self.peek() != '$' {
            self.advance(1);
            return (Token::ArithOp('/'), None);
        }

        // Se consume el "/$" de apertura y se busca el "$/" de cierre
        // sin salir de la línea
        self.advance(2);
        loop {
            while self.cur != '$' && self.cur != '\n' && self.cur != NUL {
                self.advance(1);
            }

            if self.cur != '$' {
                // Fin de línea sin cierre; el cursor queda sobre el
                // terminador para que la línea aún emita su <newline>
                return (Token::InvalidComment, Some(LexicalError::UnclosedComment));
            }

            match self.peek() {
                '/' => {
                    self.advance(2);
                    return (Token::Comment, None);
                }

                '\n' | NUL => {
                    self.advance(1);
                    return (Token::InvalidComment, Some(LexicalError::UnclosedComment));
                }

                // Un '$' interior no cierra nada; se sigue buscando
                _ => self.advance(1),
            }
        }
    }

    /// Sub-autómata para palabras: palabra clave, tipo de dato o
    /// identificador, incluyendo los identificadores inválidos.
    fn keyword_data_type_or_id(&mut self) -> (Token, Option<LexicalError>) {
        let mut word = String::new();
        while lang::is_word_char(self.cur) {
            word.push(self.cur);
            self.advance(1);
        }

        if self.cur == '.' {
            // El punto ofensor se incluye en el diagnóstico
            word.push(self.cur);
            self.advance(1);
            return (Token::InvalidId, Some(LexicalError::InvalidIdentifier(word)));
        }

        if !lang::is_whitespace(self.cur)
            && !lang::is_punctuation(self.cur)
            && !lang::is_arithmetic_op(self.cur)
        {
            // El carácter ofensor no se consume; será tokenizado por
            // su propia categoría en la siguiente llamada
            return (Token::InvalidId, Some(LexicalError::InvalidIdentifier(word)));
        }

        if let Ok(keyword) = word.parse::<Keyword>() {
            (Token::Keyword(keyword), None)
        } else if let Ok(data_type) = word.parse::<DataType>() {
            (Token::DataType(data_type), None)
        } else {
            let index = self.symbols.intern(&word);
            (Token::Id(index), None)
        }
    }

    /// Sub-autómata para dígitos: entero, flotante o la condición de
    /// dígito seguido por letra.
    fn number(&mut self) -> (Token, Option<LexicalError>) {
        if lang::is_letter(self.peek()) {
            // Se consume la corrida completa para garantizar progreso
            while self.cur.is_ascii_digit() || lang::is_letter(self.cur) {
                self.advance(1);
            }

            return (Token::Unsupported, Some(LexicalError::DigitWithLetter));
        }

        let mut digits = String::new();
        while self.cur.is_ascii_digit() {
            digits.push(self.cur);
            self.advance(1);
        }

        if self.cur == '.' {
            let (tail, valid) = self.float_tail();
            let value = format!("{}{}", digits, tail);

            if valid {
                (Token::Float(value), None)
            } else {
                (Token::InvalidFloat, Some(LexicalError::InvalidFloat(value)))
            }
        } else {
            (Token::Num(digits), None)
        }
    }

    /// Sub-autómata para la porción decimal de un flotante.
    ///
    /// El cursor se encuentra sobre el `.`. Reconoce la expresión
    /// regular `digitos "." digitos ("E" digitos)?` con corrida
    /// voraz y lookahead del terminador; una `E` final sin dígitos
    /// sigue siendo válida si la termina puntuación o un espacio
    /// horizontal, pero no el final de la línea.
    fn float_tail(&mut self) -> (String, bool) {
        let mut tail = String::new();

        if !self.peek().is_ascii_digit() && self.peek() != 'E' {
            return (self.consume_line(tail), false);
        }

        tail.push(self.cur);
        self.advance(1);

        if !self.cur.is_ascii_digit() {
            // "3.E5" y similares: el exponente exige parte fraccionaria
            return (self.consume_line(tail), false);
        }

        while self.cur.is_ascii_digit() {
            tail.push(self.cur);
            self.advance(1);
        }

        if self.cur == 'E' {
            match self.peek() {
                c if c.is_ascii_digit() => {
                    tail.push(self.cur);
                    self.advance(1);
                    while self.cur.is_ascii_digit() {
                        tail.push(self.cur);
                        self.advance(1);
                    }
                }

                '\n' | NUL => {
                    tail.push(self.cur);
                    self.advance(1);
                    return (tail, false);
                }

                c if self.is_float_terminator(c) => {
                    tail.push(self.cur);
                    self.advance(1);
                    return (tail, true);
                }

                _ => return (self.consume_line(tail), false),
            }
        }

        if self.is_float_terminator(self.cur) || self.cur == '\n' || self.cur == NUL {
            (tail, true)
        } else {
            (self.consume_line(tail), false)
        }
    }

    /// Caracteres que terminan válidamente un flotante: puntuación
    /// distinta de `.`, o espacio horizontal.
    fn is_float_terminator(&self, c: char) -> bool {
        (lang::is_punctuation(c) && c != '.') || c == ' ' || c == '\t'
    }

    /// Consume hasta el final de la línea, acumulando sobre `lexeme`.
    fn consume_line(&mut self, mut lexeme: String) -> String {
        while self.cur != '\n' && self.cur != NUL {
            lexeme.push(self.cur);
            self.advance(1);
        }

        lexeme
    }

    /// Sub-autómata para operadores aritméticos; un `-` seguido de
    /// dígito forma un literal entero con signo.
    fn arithmetic_op(&mut self) -> (Token, Option<LexicalError>) {
        if self.cur == '-' && self.peek().is_ascii_digit() {
            let mut digits = String::from('-');
            self.advance(1);
            while self.cur.is_ascii_digit() {
                digits.push(self.cur);
                self.advance(1);
            }

            return (Token::Num(digits), None);
        }

        let op = self.cur;
        self.advance(1);
        (Token::ArithOp(op), None)
    }

    fn assign_or_eq(&mut self) -> (Token, Option<LexicalError>) {
        if self.peek() == '=' {
            self.advance(2);
            (Token::RelOp(RelOp::Eq), None)
        } else {
            self.advance(1);
            (Token::Assign, None)
        }
    }

    fn relational(&mut self) -> RelOp {
        if self.peek() == '=' {
            let op = RelOp::from_double(self.cur).unwrap_or(RelOp::Eq);
            self.advance(2);
            op
        } else {
            let op = RelOp::from_single(self.cur).unwrap_or(RelOp::Lt);
            self.advance(1);
            op
        }
    }

    fn negated_relational(&mut self) -> (Token, Option<LexicalError>) {
        if self.peek() == '=' {
            self.advance(2);
            (Token::RelOp(RelOp::Ne), None)
        } else {
            self.advance(1);
            (Token::Unrecognized, Some(LexicalError::Unrecognized))
        }
    }

    /// Literal de cadena: se consume hasta la siguiente comilla doble
    /// o, si no la hay, hasta el final de la línea.
    fn string_literal(&mut self) -> Token {
        let mut text = String::new();
        self.advance(1);
        while self.cur != '"' && self.cur != '\n' && self.cur != NUL {
            text.push(self.cur);
            self.advance(1);
        }

        if self.cur == '"' {
            self.advance(1);
        }

        Token::Literal(text)
    }

    /// Constante de carácter: acumula hasta `'`, fin de línea o
    /// puntuación. Exactamente un carácter acumulado es válido.
    fn char_constant(&mut self) -> (Token, Option<LexicalError>) {
        let mut text = String::new();
        self.advance(1);
        while self.cur != '\'' && self.cur != '\n' && self.cur != NUL
            && !lang::is_punctuation(self.cur)
        {
            text.push(self.cur);
            self.advance(1);
        }

        if self.cur == '\'' {
            self.advance(1);
        }

        match text.chars().next() {
            Some(only) if text.chars().count() == 1 => (Token::CharConst(only), None),
            _ => {
                let error = LexicalError::InvalidCharConstant(text.clone());
                (Token::InvalidChar(text), Some(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tokeniza una sola línea con una tabla de símbolos propia.
    fn lex_line(line: &str) -> (Vec<Token>, Vec<LexicalError>, SymbolTable) {
        let mut symbols = SymbolTable::new();
        let (tokens, errors) = lex_into(line, &mut symbols);
        (tokens, errors, symbols)
    }

    fn lex_into(line: &str, symbols: &mut SymbolTable) -> (Vec<Token>, Vec<LexicalError>) {
        let mut lexer = Lexer::new(line, symbols);
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        while !lexer.exhausted() {
            let (token, error) = lexer.next_token();
            tokens.push(token);
            errors.extend(error);
        }

        (tokens, errors)
    }

    #[test]
    fn function_header() {
        let (tokens, errors, symbols) = lex_line("int main()\n");

        assert_eq!(
            tokens,
            vec![
                Token::DataType(DataType::Int),
                Token::Blank,
                Token::Id(1),
                Token::Punct('('),
                Token::Punct(')'),
                Token::Newline,
            ]
        );

        assert!(errors.is_empty());
        assert_eq!(symbols.name(1), Some("main"));
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn unterminated_final_line_has_no_newline() {
        // El centinela anexado no es un terminador real y no se
        // tokeniza
        let (tokens, errors, _) = lex_line("int main()");

        assert_eq!(
            tokens,
            vec![
                Token::DataType(DataType::Int),
                Token::Blank,
                Token::Id(1),
                Token::Punct('('),
                Token::Punct(')'),
            ]
        );

        assert!(errors.is_empty());
        assert!(!tokens.contains(&Token::Newline));
    }

    #[test]
    fn declaration_with_initializer() {
        let (tokens, errors, _) = lex_line("int x = 5;");

        assert!(errors.is_empty());
        assert!(tokens.contains(&Token::DataType(DataType::Int)));
        assert!(tokens.contains(&Token::Id(1)));
        assert!(tokens.contains(&Token::Assign));
        assert!(tokens.contains(&Token::Num("5".to_string())));
        assert!(tokens.contains(&Token::Punct(';')));
    }

    #[test]
    fn identifier_indices_are_stable() {
        let mut symbols = SymbolTable::new();
        lex_into("int alpha = 1;", &mut symbols);
        lex_into("int beta = 2;", &mut symbols);
        let (tokens, _) = lex_into("alpha = beta;", &mut symbols);

        assert_eq!(tokens[0], Token::Id(1));
        assert!(tokens.contains(&Token::Id(2)));
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols.name(2), Some("beta"));
    }

    #[test]
    fn keywords_and_ids_are_distinguished() {
        let (tokens, _, symbols) = lex_line("if ifx");

        assert_eq!(tokens[0], Token::Keyword(Keyword::If));
        assert_eq!(tokens[2], Token::Id(1));
        assert_eq!(symbols.name(1), Some("ifx"));
    }

    #[test]
    fn closed_comment_is_a_single_token() {
        let (tokens, errors, _) = lex_line("/$ hello $/");

        assert_eq!(tokens, vec![Token::Comment]);
        assert!(errors.is_empty());
    }

    #[test]
    fn unclosed_comment_reports_error() {
        let (tokens, errors, _) = lex_line("/$ hello \n");

        assert_eq!(tokens[0], Token::InvalidComment);
        assert_eq!(errors, vec![LexicalError::UnclosedComment]);
        // El cursor queda sobre el terminador de la línea, que
        // todavía se tokeniza
        assert_eq!(tokens.last(), Some(&Token::Newline));
    }

    #[test]
    fn dollar_inside_comment_does_not_close_it() {
        let (tokens, errors, _) = lex_line("/$ a $$ b $/\n");

        assert_eq!(tokens, vec![Token::Comment, Token::Newline]);
        assert!(errors.is_empty());
    }

    #[test]
    fn slash_alone_is_division() {
        let (tokens, _, _) = lex_line("a / b");

        assert_eq!(tokens[2], Token::ArithOp('/'));
    }

    #[test]
    fn valid_floats() {
        let (tokens, errors, _) = lex_line("x = 2.5;");
        assert!(tokens.contains(&Token::Float("2.5".to_string())));
        assert!(errors.is_empty());

        let (tokens, errors, _) = lex_line("x = 3.14E5;");
        assert!(tokens.contains(&Token::Float("3.14E5".to_string())));
        assert!(errors.is_empty());
    }

    #[test]
    fn dangling_exponent_at_end_of_line_is_invalid() {
        let (tokens, errors, _) = lex_line("3.14E");

        assert_eq!(tokens[0], Token::InvalidFloat);
        assert_eq!(errors, vec![LexicalError::InvalidFloat("3.14E".to_string())]);
    }

    #[test]
    fn float_without_fraction_is_invalid() {
        let (tokens, errors, _) = lex_line("3.E5;");

        assert_eq!(tokens[0], Token::InvalidFloat);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn signed_integer_literal() {
        let (tokens, _, _) = lex_line("x = -42;");

        assert!(tokens.contains(&Token::Num("-42".to_string())));
    }

    #[test]
    fn relational_operators() {
        let (tokens, _, _) = lex_line("a <= b == c != d > e");

        assert!(tokens.contains(&Token::RelOp(RelOp::Le)));
        assert!(tokens.contains(&Token::RelOp(RelOp::Eq)));
        assert!(tokens.contains(&Token::RelOp(RelOp::Ne)));
        assert!(tokens.contains(&Token::RelOp(RelOp::Gt)));
    }

    #[test]
    fn string_and_char_literals() {
        let (tokens, errors, _) = lex_line("x = \"hi\";");
        assert!(tokens.contains(&Token::Literal("hi".to_string())));
        assert!(errors.is_empty());

        let (tokens, errors, _) = lex_line("c = 'a';");
        assert!(tokens.contains(&Token::CharConst('a')));
        assert!(errors.is_empty());
    }

    #[test]
    fn long_char_constant_is_invalid() {
        let (tokens, errors, _) = lex_line("c = 'ab';");

        assert!(tokens.contains(&Token::InvalidChar("ab".to_string())));
        assert_eq!(
            errors,
            vec![LexicalError::InvalidCharConstant("ab".to_string())]
        );
    }

    #[test]
    fn identifier_followed_by_dot_is_invalid() {
        let (tokens, errors, _) = lex_line("foo.");

        assert_eq!(tokens[0], Token::InvalidId);
        assert_eq!(
            errors,
            vec![LexicalError::InvalidIdentifier("foo.".to_string())]
        );
    }

    #[test]
    fn unrecognized_character() {
        let (tokens, errors, _) = lex_line("@");

        assert_eq!(tokens[0], Token::Unrecognized);
        assert_eq!(errors, vec![LexicalError::Unrecognized]);
    }

    #[test]
    fn every_line_terminates() {
        // Totalidad: líneas degeneradas también producen secuencias finitas
        for line in &["", "/$", "\"abc", "'abc", "123abc", "1.2.3.4", "x@#!"] {
            let (tokens, _, _) = lex_line(line);
            let consumed: usize = tokens.len();
            assert!(consumed <= line.len() + 1);
        }
    }

    #[test]
    fn wire_format() {
        assert_eq!(Token::Keyword(Keyword::If).to_string(), "<keyword, if>");
        assert_eq!(Token::DataType(DataType::Int).to_string(), "<dt, int>");
        assert_eq!(Token::Id(3).to_string(), "<id, 3>");
        assert_eq!(Token::Num("42".into()).to_string(), "<num, 42>");
        assert_eq!(Token::Float("3.14E5".into()).to_string(), "<float, 3.14E5>");
        assert_eq!(Token::Literal("hello".into()).to_string(), "<literal, hello>");
        assert_eq!(Token::CharConst('a').to_string(), "<char_constant, a>");
        assert_eq!(Token::RelOp(RelOp::Le).to_string(), "<rel_op, LE>");
        assert_eq!(Token::Assign.to_string(), "<assign, =>");
        assert_eq!(Token::ArithOp('+').to_string(), "<+>");
        assert_eq!(Token::Punct(';').to_string(), "<punctuator, ;>");
        assert_eq!(Token::Newline.to_string(), "<newline>");
    }
}
