//! MTL statement tokenizer
//!
//! Splits one line into whitespace-delimited tokens while remembering where
//! each token starts in the line. Texture statements need those offsets: the
//! file name is everything from its first token to the end of the line, so
//! names with embedded (even repeated) spaces come back exactly as written.

use thiserror::Error;

use crate::foundation::math::{rgba, Vec3, Vec4};

/// Recoverable problems with a single statement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// A numeric argument did not parse
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// A color statement had an unusable argument list
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Every argument of a map statement was consumed as an option
    #[error("texture file name missing after options")]
    MissingTexturePath,
}

/// Statement keywords the parser acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `newmtl`
    NewMaterial,
    /// `Kd` / `kd`
    DiffuseColor,
    /// `map_Kd` / `map_kd`
    DiffuseMap,
    /// `map_Bump` / `map_bump`
    BumpMap,
    /// `Ks` / `ks`
    SpecularColor,
    /// `Ka` / `ka`, used as emission
    AmbientColor,
    /// `map_Ka` / `map_ka`, used as emission map
    AmbientMap,
    /// `d`
    Dissolve,
    /// `Tr`
    Transparency,
    /// `Ns` / `ns`
    SpecularExponent,
}

impl Keyword {
    /// Match a keyword token against the recognised spellings
    pub fn from_token(token: &str) -> Option<Self> {
        let keyword = match token {
            "newmtl" => Self::NewMaterial,
            "Kd" | "kd" => Self::DiffuseColor,
            "map_Kd" | "map_kd" => Self::DiffuseMap,
            "map_Bump" | "map_bump" => Self::BumpMap,
            "Ks" | "ks" => Self::SpecularColor,
            "Ka" | "ka" => Self::AmbientColor,
            "map_Ka" | "map_ka" => Self::AmbientMap,
            "d" => Self::Dissolve,
            "Tr" => Self::Transparency,
            "Ns" | "ns" => Self::SpecularExponent,
            _ => return None,
        };
        Some(keyword)
    }
}

/// Number of values that follow a texture option flag
///
/// `None` means the token is not a recognised option.
pub fn option_arity(flag: &str) -> Option<usize> {
    match flag {
        "-bm" | "-clamp" | "-blendu" | "-blendv" | "-imfchan" | "-texres" => Some(1),
        "-mm" => Some(2),
        "-o" | "-s" | "-t" => Some(3),
        _ => None,
    }
}

/// Strip surrounding whitespace, including a stray `\r`
pub fn clean_line(raw: &str) -> &str {
    raw.trim()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    offset: usize,
    text: &'a str,
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token { offset: s, text: &line[s..i] });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(Token { offset: s, text: &line[s..] });
    }

    tokens
}

fn parse_number(token: &str) -> Result<f32, StatementError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| StatementError::InvalidNumber(token.to_string()))
}

/// Color components read from a statement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorValue {
    /// Red, green, blue
    pub rgb: Vec3,
    /// Alpha, when the statement supplied a fourth component
    pub alpha: Option<f32>,
}

impl ColorValue {
    /// RGBA color, using `default_alpha` when no alpha was given
    pub fn with_default_alpha(self, default_alpha: f32) -> Vec4 {
        rgba(self.rgb, self.alpha.unwrap_or(default_alpha))
    }
}

/// One tokenized, non-blank, non-comment line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement<'a> {
    line: &'a str,
    tokens: Vec<Token<'a>>,
}

impl<'a> Statement<'a> {
    /// Tokenize a raw line
    ///
    /// Returns `None` for blank lines, comments and lines with fewer than two
    /// tokens; none of those can carry a statement.
    pub fn classify(raw: &'a str) -> Option<Self> {
        let line = clean_line(raw);
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let tokens = tokenize(line);
        if tokens.len() < 2 {
            return None;
        }

        Some(Self { line, tokens })
    }

    /// The cleaned line this statement came from
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// The first token
    pub fn keyword(&self) -> &'a str {
        self.tokens[0].text
    }

    /// Arguments following the keyword
    pub fn args(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tokens[1..].iter().map(|token| token.text)
    }

    /// Everything after the keyword, internal whitespace preserved
    pub fn rest(&self) -> &'a str {
        &self.line[self.tokens[1].offset..]
    }

    /// Token index where a map statement's file name starts
    fn texture_name_index(&self) -> Option<usize> {
        let mut i = 1;
        while i < self.tokens.len() {
            match option_arity(self.tokens[i].text) {
                Some(arity) => i += arity + 1,
                None => return Some(i),
            }
        }
        None
    }

    /// File name of a `map_*` statement
    ///
    /// Known options and their values are skipped; the name runs from the
    /// first remaining token to the end of the line.
    pub fn texture_path(&self) -> Result<&'a str, StatementError> {
        let index = self
            .texture_name_index()
            .ok_or(StatementError::MissingTexturePath)?;
        Ok(&self.line[self.tokens[index].offset..])
    }

    /// Value following option `flag` (case-insensitive), or `default`
    ///
    /// A flag with a missing or non-numeric value also yields `default`.
    pub fn option_value(&self, flag: &str, default: f32) -> f32 {
        let last = self.tokens.len() - 1;
        (1..last)
            .find(|&i| self.tokens[i].text.eq_ignore_ascii_case(flag))
            .and_then(|i| parse_number(self.tokens[i + 1].text).ok())
            .unwrap_or(default)
    }

    /// The first argument as a number
    pub fn scalar(&self) -> Result<f32, StatementError> {
        parse_number(self.tokens[1].text)
    }

    /// Color arguments: `r`, `r g b` or `r g b a`
    ///
    /// A lone component is a grey level. The `spectral` and `xyz` forms are
    /// not supported.
    pub fn color(&self) -> Result<ColorValue, StatementError> {
        let first = self.tokens[1].text;
        if first.eq_ignore_ascii_case("spectral") || first.eq_ignore_ascii_case("xyz") {
            return Err(StatementError::InvalidColor(format!("'{}' form is not supported", first)));
        }

        let components = self
            .args()
            .take(4)
            .map(parse_number)
            .collect::<Result<Vec<_>, _>>()?;

        match components.as_slice() {
            [grey] => Ok(ColorValue { rgb: Vec3::new(*grey, *grey, *grey), alpha: None }),
            [r, g, b] => Ok(ColorValue { rgb: Vec3::new(*r, *g, *b), alpha: None }),
            [r, g, b, a] => Ok(ColorValue { rgb: Vec3::new(*r, *g, *b), alpha: Some(*a) }),
            other => Err(StatementError::InvalidColor(format!(
                "expected 1, 3 or 4 components, found {}",
                other.len()
            ))),
        }
    }
}
