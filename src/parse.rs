use std::path::PathBuf;

/// A single command line after tokenizing: argv plus its redirections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub argv: Vec<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub background: bool,
}

impl ParsedCommand {
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("missing file name after `{0}`")]
    MissingTarget(char),
    #[error("more than one `{0}` redirection")]
    DuplicateRedirect(char),
    #[error("`&` must end the command")]
    MisplacedBackground,
    #[error("pipelines are not supported")]
    Pipeline,
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
}

#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    Input,
    Output,
    Background,
    Pipe,
}

fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '<' | '>' | '&' | '|' => {
                chars.next();
                tokens.push(match c {
                    '<' => Token::Input,
                    '>' => Token::Output,
                    '&' => Token::Background,
                    _ => Token::Pipe,
                });
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '<' | '>' | '&' | '|') {
                        break;
                    }
                    chars.next();
                    if c == '"' || c == '\'' {
                        // quoted run, taken literally up to the matching quote
                        loop {
                            match chars.next() {
                                Some(q) if q == c => break,
                                Some(other) => word.push(other),
                                None => return Err(ParseError::UnterminatedQuote(c)),
                            }
                        }
                    } else {
                        word.push(c);
                    }
                }
                tokens.push(Token::Word(word));
            }
        }
    }
    Ok(tokens)
}

/// Turn a raw line into a [`ParsedCommand`]. Blank input gives an empty argv.
pub fn parse(text: &str) -> Result<ParsedCommand, ParseError> {
    let mut cmd = ParsedCommand::default();
    let mut tokens = tokenize(text)?.into_iter().peekable();
    while let Some(token) = tokens.next() {
        match token {
            Token::Word(word) => cmd.argv.push(word),
            Token::Input | Token::Output => {
                let (op, slot) = match token {
                    Token::Input => ('<', &mut cmd.input),
                    _ => ('>', &mut cmd.output),
                };
                let target = match tokens.next() {
                    Some(Token::Word(path)) => PathBuf::from(path),
                    _ => return Err(ParseError::MissingTarget(op)),
                };
                if slot.replace(target).is_some() {
                    return Err(ParseError::DuplicateRedirect(op));
                }
            }
            Token::Background => {
                if tokens.peek().is_some() {
                    return Err(ParseError::MisplacedBackground);
                }
                cmd.background = true;
            }
            Token::Pipe => return Err(ParseError::Pipeline),
        }
    }
    Ok(cmd)
}
