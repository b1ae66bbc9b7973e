//! Análisis sintáctico.
//!
//! El parser es de descenso recursivo, dirigido por conjuntos FIRST y
//! FOLLOW precalculados sobre la gramática LL(1) del lenguaje. Cada
//! no terminal es un método; en cada uno se despacha sobre el token
//! actual: si pertenece a FIRST se ejecuta la producción, si el no
//! terminal deriva épsilon y el token pertenece a FOLLOW se retorna
//! en silencio, y en cualquier otro caso se activa la recuperación de
//! pánico, que descarta exactamente un token y continúa. El análisis
//! semántico corre integrado a las producciones.

use crate::{
    error::ErrorStream,
    lang::Keyword,
    lex::{SymbolTable, Token},
    semantic::{self, Kind, RecordTable, Type},
};

/// Token de fin de flujo, tal como aparece en los diagnósticos.
const EOS: &str = "<$>";

/// Un símbolo terminal de la gramática.
///
/// Los conjuntos FIRST y FOLLOW se expresan sobre estos símbolos. Un
/// terminal puede discriminar por unidad léxica (`Dt`, `Id`) o por
/// atributo (`Kw`, `Punct`, `Op`); ambas mitades del token participan
/// en la pertenencia a un conjunto.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Dt,
    Id,
    Num,
    Float,
    Literal,
    CharConst,
    RelOp,
    Assign,
    Kw(Keyword),
    Punct(char),
    Op(char),
    Eos,
}

impl Term {
    /// Determina si un token concreto pertenece a este terminal.
    pub fn admits(self, token: &Token) -> bool {
        match (self, token) {
            (Term::Dt, Token::DataType(_)) => true,
            (Term::Id, Token::Id(_)) => true,
            (Term::Num, Token::Num(_)) => true,
            (Term::Float, Token::Float(_)) => true,
            (Term::Literal, Token::Literal(_)) => true,
            (Term::CharConst, Token::CharConst(_)) => true,
            (Term::RelOp, Token::RelOp(_)) => true,
            (Term::Assign, Token::Assign) => true,
            (Term::Kw(keyword), Token::Keyword(k)) => *k == keyword,
            (Term::Punct(c), Token::Punct(p)) => *p == c,
            (Term::Op(c), Token::ArithOp(op)) => *op == c,
            _ => false,
        }
    }
}

/// No terminales de la gramática.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Nonterminal {
    Program,
    ParamList,
    PList,
    Stmts,
    StmtsPrime,
    DecStmt,
    List,
    OptionalAssign,
    AssignStmt,
    Expr,
    EPrime,
    T,
    TPrime,
    F,
    ForStmt,
    Type,
    IfStmt,
    OptionalElse,
    ReturnStmt,
}

/// Conjunto FIRST de un no terminal.
pub fn first(nt: Nonterminal) -> &'static [Term] {
    use {Nonterminal::*, Term::*};

    match nt {
        Program => &[Dt, Kw(Keyword::Void), Id],
        ParamList => &[Dt],
        PList => &[Punct(',')],
        Stmts | StmtsPrime => &[
            Dt,
            Id,
            Kw(Keyword::For),
            Kw(Keyword::If),
            Kw(Keyword::Return),
        ],
        DecStmt => &[Dt],
        List => &[Punct(',')],
        OptionalAssign => &[Assign],
        AssignStmt => &[Id],
        Expr | T | F => &[Punct('('), Id, Num, Float, Literal, CharConst],
        EPrime => &[Op('+'), Op('-')],
        TPrime => &[Op('*'), Op('/'), Op('^')],
        ForStmt => &[Kw(Keyword::For)],
        Type => &[Dt],
        IfStmt => &[Kw(Keyword::If)],
        OptionalElse => &[Kw(Keyword::Else)],
        ReturnStmt => &[Kw(Keyword::Return)],
    }
}

/// Conjunto FOLLOW de un no terminal.
pub fn follow(nt: Nonterminal) -> &'static [Term] {
    use {Nonterminal::*, Term::*};

    match nt {
        Program => &[Eos],
        ParamList | PList => &[Punct(')')],
        Stmts | StmtsPrime => &[Punct('}')],
        DecStmt | AssignStmt | ForStmt | IfStmt | ReturnStmt | OptionalElse => &[
            Dt,
            Id,
            Kw(Keyword::For),
            Kw(Keyword::If),
            Kw(Keyword::Return),
            Punct('}'),
        ],
        List => &[Punct(';')],
        OptionalAssign => &[Punct(','), Punct(';')],
        Expr | EPrime => &[Punct(')'), Punct(';'), Punct(','), RelOp],
        T | TPrime => &[
            Op('+'),
            Op('-'),
            Punct(')'),
            Punct(';'),
            Punct(','),
            RelOp,
        ],
        F => &[
            Op('*'),
            Op('/'),
            Op('^'),
            Op('+'),
            Op('-'),
            Punct(')'),
            Punct(';'),
            Punct(','),
            RelOp,
        ],
        Type => &[Id],
    }
}

/// Determina si un no terminal deriva épsilon.
pub fn nullable(nt: Nonterminal) -> bool {
    use Nonterminal::*;

    matches!(
        nt,
        Stmts | StmtsPrime | PList | List | OptionalAssign | EPrime | TPrime | Type | OptionalElse
    )
}

/// Resultado completo del análisis sintáctico y semántico.
#[derive(Debug)]
pub struct Analysis {
    pub trace: Vec<String>,
    pub syntax_errors: ErrorStream,
    pub semantic_errors: ErrorStream,
    pub table: RecordTable,
}

/// Un parser de descenso recursivo.
///
/// Se construye sobre la lista de tokens ya filtrada (sin
/// comentarios, espacios horizontales ni variantes inválidas) y la
/// tabla de símbolos léxica en modo de solo lectura. El constructor
/// deja listo el primer token y la entrada inicial de la traza.
pub struct Parser<'t> {
    tokens: Vec<Token>,
    index: usize,
    symbols: &'t SymbolTable,
    table: RecordTable,
    trace: Vec<String>,
    syntax_errors: ErrorStream,
    semantic_errors: ErrorStream,
    line: usize,
    scope: u32,
    current_function: Option<usize>,

    /// Tipo de la última sentencia `return`, reservado para la
    /// verificación de firmas de función.
    pub return_stmt_type: Option<Type>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: Vec<Token>, symbols: &'t SymbolTable) -> Self {
        let mut parser = Parser {
            tokens,
            index: 0,
            symbols,
            table: RecordTable::new(),
            trace: Vec::new(),
            syntax_errors: ErrorStream::new(),
            semantic_errors: ErrorStream::new(),
            line: 0,
            scope: 0,
            current_function: None,
            return_stmt_type: None,
        };

        parser.trace.push(format!("Scope: {}", parser.scope));
        parser
    }

    /// Consume el flujo completo de tokens y entrega los cuatro
    /// artefactos del análisis.
    pub fn parse(mut self) -> Analysis {
        self.program();

        Analysis {
            trace: self.trace,
            syntax_errors: self.syntax_errors,
            semantic_errors: self.semantic_errors,
            table: self.table,
        }
    }

    // ------------------------------------------------------------
    // Manejo del flujo de tokens

    fn cur(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn bump(&mut self) {
        self.index += 1;
    }

    /// Forma textual del lookahead, o `<$>` al final del flujo.
    fn peek_text(&self) -> String {
        match self.tokens.get(self.index + 1) {
            Some(token) => token.to_string(),
            None => EOS.to_string(),
        }
    }

    /// Salta tokens `<newline>`, llevando la cuenta de líneas.
    fn skip_newlines(&mut self) {
        while matches!(self.cur(), Some(Token::Newline)) {
            self.index += 1;
            self.line += 1;
        }
    }

    fn in_first(&self, nt: Nonterminal) -> bool {
        match self.cur() {
            Some(token) => first(nt).iter().any(|&term| term.admits(token)),
            None => false,
        }
    }

    /// Pertenencia a FOLLOW; el final del flujo pertenece a todo
    /// FOLLOW para que la pila de no terminales se desenrolle.
    fn in_follow(&self, nt: Nonterminal) -> bool {
        match self.cur() {
            Some(token) => follow(nt).iter().any(|&term| term.admits(token)),
            None => true,
        }
    }

    fn cur_is(&self, term: Term) -> bool {
        self.cur().map_or(false, |token| term.admits(token))
    }

    // ------------------------------------------------------------
    // Traza y recuperación

    fn trace_token(&mut self) {
        let entry = match self.cur() {
            Some(token) => format!("matched {}", token),
            None => return,
        };

        self.trace.push(entry);
    }

    fn trace_attr(&mut self, attr: impl std::fmt::Display) {
        self.trace.push(format!("matched <{}>", attr));
    }

    fn enter_scope(&mut self) {
        self.scope += 1;
        self.trace.push(format!("Scope: {}", self.scope));
    }

    fn exit_scope(&mut self) {
        self.scope = self.scope.saturating_sub(1);
        self.trace.push(format!("Scope: {}", self.scope));
    }

    /// Recuperación de pánico: registra el diagnóstico y descarta
    /// exactamente un token, garantizando progreso.
    fn panic_recover(&mut self) {
        let message = match self.cur() {
            None => return,
            Some(token) => match token.attribute() {
                Some(attr) => format!("{} cannot be parsed", attr),
                None => format!("Expected {} but found {}", token, self.peek_text()),
            },
        };

        self.trace.push("Parsing Error!".to_string());
        self.syntax_errors.record(self.line, message);
        self.bump();
    }

    // ------------------------------------------------------------
    // Acciones semánticas

    fn name_of(&self, index: usize) -> Option<String> {
        self.symbols.name(index).map(str::to_string)
    }

    fn function_name(&self) -> Option<String> {
        self.current_function.and_then(|index| self.name_of(index))
    }

    /// Registra una declaración, verificando redeclaración exacta en
    /// el alcance actual.
    fn declare(&mut self, name: &str, return_type: Option<Type>, kind: Kind) {
        if self.table.lookup(name, return_type, self.scope) {
            self.trace.push("Re-declaration Error!".to_string());
            let message = format!("{} {} already defined in scope {}", kind, name, self.scope);
            self.semantic_errors.record(self.line, message);
        } else {
            self.table.enter(name, return_type, self.scope, kind.size());
        }
    }

    fn undeclared(&mut self, name: &str) {
        self.trace.push("Undeclared Error!".to_string());
        self.semantic_errors
            .record(self.line, format!("Undeclared identifier {}", name));
    }

    fn incompatibility(&mut self) {
        self.trace.push("Type Incompatibility Error!".to_string());
        self.semantic_errors.record(self.line, "Type Incompatibility");
    }

    /// Combinador binario de tipos: consulta la tabla de equivalencia
    /// y, ante una clave ausente, diagnostica y propaga el tipo del
    /// operando derecho.
    fn combine(&mut self, left: Option<Type>, right: Option<Type>, op: char) -> Option<Type> {
        match (left, right) {
            (Some(left), Some(right)) => match semantic::equivalence(left, right, op) {
                Some(result) => Some(result),
                None => {
                    self.incompatibility();
                    Some(right)
                }
            },

            _ => {
                self.incompatibility();
                right
            }
        }
    }

    // ------------------------------------------------------------
    // Emparejamiento de terminales

    fn match_data_type(&mut self) -> Option<Type> {
        if let Some(Token::DataType(data_type)) = self.cur() {
            let data_type = *data_type;
            self.trace_token();
            self.bump();
            self.skip_newlines();
            Some(data_type.into())
        } else {
            None
        }
    }

    fn match_id(&mut self) -> Option<usize> {
        if let Some(Token::Id(index)) = self.cur() {
            let index = *index;
            self.trace_token();
            self.bump();
            self.skip_newlines();
            Some(index)
        } else {
            None
        }
    }

    fn match_punct(&mut self, c: char) -> bool {
        if self.cur_is(Term::Punct(c)) {
            self.trace_attr(c);
            self.bump();
            self.skip_newlines();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.cur_is(Term::Kw(keyword)) {
            self.trace_attr(keyword);
            self.bump();
            self.skip_newlines();
            true
        } else {
            false
        }
    }

    fn match_assign(&mut self) -> bool {
        if self.cur_is(Term::Assign) {
            self.trace_attr('=');
            self.bump();
            self.skip_newlines();
            true
        } else {
            false
        }
    }

    fn match_rel_op(&mut self) -> bool {
        if matches!(self.cur(), Some(Token::RelOp(_))) {
            self.trace_token();
            self.bump();
            self.skip_newlines();
            true
        } else {
            false
        }
    }

    /// El operador `++` de la cláusula de paso del `for`.
    fn match_increment(&mut self) {
        let incremented = matches!(self.cur(), Some(Token::ArithOp('+')))
            && matches!(self.tokens.get(self.index + 1), Some(Token::ArithOp('+')));

        if incremented {
            self.trace.push("matched <++>".to_string());
            self.bump();
            self.bump();
            self.skip_newlines();
        }
    }

    // ------------------------------------------------------------
    // No terminales

    fn program(&mut self) {
        loop {
            self.skip_newlines();
            if self.in_first(Nonterminal::Program) {
                let mut return_type = None;
                if !self.match_keyword(Keyword::Void) {
                    return_type = self.match_data_type();
                }

                if let Some(index) = self.match_id() {
                    self.current_function = Some(index);
                    if let Some(name) = self.name_of(index) {
                        self.declare(&name, return_type, Kind::Function);
                    }
                }

                self.match_punct('(');
                if self.in_first(Nonterminal::ParamList) {
                    self.param_list();
                }
                self.match_punct(')');

                if self.match_punct('{') {
                    if let Some(name) = self.function_name() {
                        self.trace.push(format!("In {}()", name));
                    }
                    self.enter_scope();
                }

                if self.in_first(Nonterminal::Stmts) {
                    self.stmts();
                }

                self.skip_newlines();
                if self.match_punct('}') {
                    if let Some(name) = self.function_name() {
                        self.trace.push(format!("Exiting {}()", name));
                    }
                    self.exit_scope();
                }
            }

            self.skip_newlines();
            if self.at_end() || self.in_follow(Nonterminal::Program) {
                self.trace.push("EOF".to_string());
                return;
            }

            self.panic_recover();
        }
    }

    fn param_list(&mut self) {
        self.skip_newlines();
        let param_type = self.match_data_type();
        if let Some(index) = self.match_id() {
            if let Some(name) = self.name_of(index) {
                self.declare(&name, param_type, Kind::Identifier);
            }
        }

        // pList: cada entrada consume su coma, garantizando progreso
        while self.match_punct(',') {
            let param_type = self.match_data_type();
            if let Some(index) = self.match_id() {
                if let Some(name) = self.name_of(index) {
                    self.declare(&name, param_type, Kind::Identifier);
                }
            }
        }
    }

    fn stmts(&mut self) {
        self.skip_newlines();
        if self.in_first(Nonterminal::Stmts) {
            self.stmts_prime();
        }
        // Derivación épsilon: el delimitador de cierre queda para
        // quien llama
    }

    /// Repetición de sentencias, con recuperación local: un token que
    /// no abre sentencia ni pertenece a FOLLOW se descarta y la
    /// repetición continúa.
    fn stmts_prime(&mut self) {
        loop {
            self.skip_newlines();
            if self.at_end() {
                return;
            }

            if self.in_first(Nonterminal::DecStmt) {
                self.dec_stmt();
            } else if self.in_first(Nonterminal::AssignStmt) {
                self.assign_stmt();
            } else if self.in_first(Nonterminal::ForStmt) {
                self.for_stmt();
            } else if self.in_first(Nonterminal::IfStmt) {
                self.if_stmt();
            } else if self.in_first(Nonterminal::ReturnStmt) {
                self.return_stmt_type = self.return_stmt();
            } else if self.in_follow(Nonterminal::StmtsPrime) {
                return;
            } else {
                self.panic_recover();
            }
        }
    }

    fn dec_stmt(&mut self) {
        self.skip_newlines();
        let declared_type = self.match_data_type();
        if let Some(index) = self.match_id() {
            if let Some(name) = self.name_of(index) {
                self.declare(&name, declared_type, Kind::Identifier);
            }
        }

        if self.cur_is(Term::Assign) {
            self.optional_assign();
        }

        if self.cur_is(Term::Punct(',')) {
            self.list();
        }

        self.match_punct(';');
    }

    /// Continuación `", id [= expr]"` de una declaración.
    fn list(&mut self) {
        loop {
            self.skip_newlines();
            if !self.match_punct(',') {
                return;
            }

            self.match_id();
            if self.cur_is(Term::Assign) {
                self.optional_assign();
            }
        }
    }

    fn optional_assign(&mut self) {
        self.skip_newlines();
        if self.match_assign() {
            if self.in_first(Nonterminal::Expr) {
                let _ = self.expr();
            }

            self.match_punct(';');
        }
    }

    fn assign_stmt(&mut self) {
        self.skip_newlines();
        let mut target_type = None;
        if let Some(index) = self.match_id() {
            if let Some(name) = self.name_of(index) {
                target_type = self.table.return_type_of(&name, self.scope);
                if target_type.is_none() {
                    self.undeclared(&name);
                }
            }
        }

        self.match_assign();

        if self.in_first(Nonterminal::Expr) {
            let value_type = self.expr();
            if target_type != value_type {
                self.trace.push("ERROR: Type mismatch in assignment".to_string());
                self.semantic_errors
                    .record(self.line, "ERROR: Type mismatch in assignment");
            }
        }

        self.match_punct(';');
    }

    // ------------------------------------------------------------
    // Expresiones
    //
    // La factorización expr/e'/t/t'/f hace que la suma asocie por la
    // izquierda en un nivel y el producto en uno más estrecho. Cada
    // método propaga el tipo inferido de su subexpresión.

    fn expr(&mut self) -> Option<Type> {
        self.skip_newlines();
        let left = self.term();
        self.e_prime(left)
    }

    fn e_prime(&mut self, mut left: Option<Type>) -> Option<Type> {
        loop {
            self.skip_newlines();
            let op = match self.cur() {
                Some(Token::ArithOp(op @ ('+' | '-'))) => *op,
                // Rama épsilon: se propaga el tipo izquierdo
                _ => return left,
            };

            self.trace_attr(op);
            self.bump();
            let right = self.term();
            left = self.combine(left, right, op);
        }
    }

    fn term(&mut self) -> Option<Type> {
        self.skip_newlines();
        let left = self.factor();
        self.t_prime(left)
    }

    fn t_prime(&mut self, mut left: Option<Type>) -> Option<Type> {
        loop {
            self.skip_newlines();
            let op = match self.cur() {
                Some(Token::ArithOp(op @ ('*' | '/' | '^'))) => *op,
                _ => return left,
            };

            self.trace_attr(op);
            self.bump();
            let right = self.factor();
            left = self.combine(left, right, op);
        }
    }

    fn factor(&mut self) -> Option<Type> {
        self.skip_newlines();
        match self.cur() {
            Some(Token::Punct('(')) => {
                self.match_punct('(');
                let inner = if self.in_first(Nonterminal::Expr) {
                    self.expr()
                } else {
                    None
                };
                self.match_punct(')');
                inner
            }

            Some(Token::Id(index)) => {
                let index = *index;
                self.trace_token();
                self.bump();
                self.skip_newlines();
                self.name_of(index)
                    .and_then(|name| self.table.return_type_of(&name, self.scope))
            }

            Some(Token::Num(_)) => {
                self.trace_token();
                self.bump();
                self.skip_newlines();
                Some(Type::Int)
            }

            Some(Token::Float(_)) => {
                self.trace_token();
                self.bump();
                self.skip_newlines();
                Some(Type::Float)
            }

            Some(Token::Literal(_)) => {
                self.trace_token();
                self.bump();
                self.skip_newlines();
                Some(Type::Str)
            }

            Some(Token::CharConst(_)) => {
                self.trace_token();
                self.bump();
                self.skip_newlines();
                Some(Type::Char)
            }

            // Quien llama verifica FIRST(f) antes de descender
            _ => None,
        }
    }

    // ------------------------------------------------------------
    // Sentencias estructuradas

    fn for_stmt(&mut self) {
        self.skip_newlines();
        self.match_keyword(Keyword::For);
        self.match_punct('(');

        if self.in_first(Nonterminal::Type) {
            self.match_data_type();
        }
        self.match_id();
        self.match_assign();
        if self.in_first(Nonterminal::Expr) {
            self.expr();
        }
        self.match_punct(';');

        if self.in_first(Nonterminal::Expr) {
            self.expr();
        }
        self.match_rel_op();
        if self.in_first(Nonterminal::Expr) {
            self.expr();
        }
        self.match_punct(';');

        self.match_id();
        self.match_increment();
        self.match_punct(')');

        if self.match_punct('{') {
            self.enter_scope();
        }
        if self.in_first(Nonterminal::Stmts) {
            self.stmts();
        }
        self.skip_newlines();
        if self.match_punct('}') {
            self.exit_scope();
        }
    }

    fn if_stmt(&mut self) {
        self.skip_newlines();
        self.match_keyword(Keyword::If);
        self.match_punct('(');

        if self.in_first(Nonterminal::Expr) {
            self.expr();
        }
        self.match_rel_op();
        if self.in_first(Nonterminal::Expr) {
            self.expr();
        }
        self.match_punct(')');

        if self.match_punct('{') {
            self.enter_scope();
        }
        if self.in_first(Nonterminal::Stmts) {
            self.stmts();
        }
        self.skip_newlines();
        if self.match_punct('}') {
            self.exit_scope();
        }

        if self.in_first(Nonterminal::OptionalElse) {
            self.optional_else();
        }
    }

    fn optional_else(&mut self) {
        self.skip_newlines();
        if self.match_keyword(Keyword::Else) {
            if self.match_punct('{') {
                self.enter_scope();
            }
            if self.in_first(Nonterminal::Stmts) {
                self.stmts();
            }
            self.skip_newlines();
            if self.match_punct('}') {
                self.exit_scope();
            }
        }
    }

    fn return_stmt(&mut self) -> Option<Type> {
        self.skip_newlines();
        self.match_keyword(Keyword::Return);

        let mut value_type = None;
        if self.in_first(Nonterminal::Expr) {
            value_type = self.expr();
        }

        self.match_punct(';');
        value_type
    }
}
