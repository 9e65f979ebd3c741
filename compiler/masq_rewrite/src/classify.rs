//! Context-aware identifier classification.
//!
//! Walks the significant tokens of one lexed file and finds every place a
//! customer-defined name is declared, together with its category. The
//! context threaded through the walk is small: which division we are in,
//! the current data section, whether a file description is open, and the
//! running storage layout.
//!
//! Rules, in priority order at each token:
//!
//! | form                                   | category                 |
//! |----------------------------------------|--------------------------|
//! | `PROGRAM-ID [.] name`                  | `ProgramName`            |
//! | `COPY`/`INCLUDE name`                  | `IncludedFragmentName`   |
//! | `name SECTION` (procedure division)    | `SectionName`            |
//! | Area A `name .` (procedure division)   | `ParagraphName`          |
//! | `88 name`                              | `ConditionName`          |
//! | `nn name ... EXTERNAL`                 | `CrossProgramName`       |
//! | `01 name` under `FD`/`SD`              | `FileRecordName`         |
//! | `nn name`                              | `DataName`               |
//! | `SELECT name`, `FD`/`SD name`          | `FileRecordName`         |
//! | `INDEXED BY name...`                   | `IndexName`              |
//!
//! Names with a platform prefix are reported as `SystemReserved`.
//! Classification never looks at the mapping table; the same tokens always
//! produce the same declarations.

use rustc_hash::FxHashMap;
use tracing::trace;

use masq_deps::is_system_fragment;
use masq_lexer::{
    has_system_prefix, source_column, LayoutDescriptor, LexedSource, Token, TokenKind, Usage,
    AREA_A_WIDTH,
};
use masq_names::IdentifierCategory;

use crate::layout::{EntryShape, StorageLayout, StoragePosition};

/// A declared identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// The name as written (literal names without quotes).
    pub name: String,
    pub category: IdentifierCategory,
    /// 1-based line.
    pub line: u32,
    /// 1-based source column.
    pub column: u32,
    /// Storage position of data items.
    pub position: Option<StoragePosition>,
}

/// A `REDEFINES` clause as declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayDeclaration {
    /// Upper-cased overlay name, `FILLER` for unnamed overlays.
    pub overlay: String,
    /// Upper-cased overlaid name.
    pub target: String,
    /// Number of groups enclosing the overlay.
    pub nesting_depth: u32,
    /// Position the overlay was placed at in this file.
    pub declared: StoragePosition,
    /// Position of the most recent target declared earlier in this file.
    pub target_position: Option<StoragePosition>,
    /// Line of the target token.
    pub line: u32,
    /// 1-based source column of the target token.
    pub column: u32,
}

/// Everything classification found in one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
    pub overlays: Vec<OverlayDeclaration>,
}

impl Classification {
    /// Storage positions of named data items, in declaration order.
    pub fn positions(&self) -> impl Iterator<Item = (&str, &StoragePosition)> {
        self.declarations
            .iter()
            .filter_map(|d| d.position.as_ref().map(|p| (d.name.as_str(), p)))
    }
}

/// Classify the declarations of a lexed file.
pub fn classify(source: &LexedSource) -> Classification {
    Classifier::new(source).run()
}

// ─── Context ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
enum Region {
    /// Identification and environment divisions, or a fragment without
    /// division headers.
    #[default]
    Header,
    LayoutDefinition,
    Executable,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DataSection {
    File,
    WorkingStorage,
    LocalStorage,
    Linkage,
}

impl DataSection {
    fn from_word(tok: &Token) -> Option<DataSection> {
        if tok.is_word("FILE") {
            Some(DataSection::File)
        } else if tok.is_word("WORKING-STORAGE") {
            Some(DataSection::WorkingStorage)
        } else if tok.is_word("LOCAL-STORAGE") {
            Some(DataSection::LocalStorage)
        } else if tok.is_word("LINKAGE") {
            Some(DataSection::Linkage)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
struct ClassifyContext {
    region: Region,
    section: Option<DataSection>,
    /// The next token starts a sentence.
    sentence_start: bool,
    /// An `FD`/`SD` entry is open in the file section.
    file_description: bool,
}

struct Classifier<'a> {
    tokens: Vec<(u32, &'a Token)>,
    pos: usize,
    ctx: ClassifyContext,
    layout: StorageLayout,
    /// Upper-cased data name to its most recent position.
    positions: FxHashMap<String, StoragePosition>,
    out: Classification,
}

impl<'a> Classifier<'a> {
    fn new(source: &'a LexedSource) -> Self {
        Classifier {
            tokens: source.significant_tokens().collect(),
            pos: 0,
            ctx: ClassifyContext {
                sentence_start: true,
                ..ClassifyContext::default()
            },
            layout: StorageLayout::new(),
            positions: FxHashMap::default(),
            out: Classification::default(),
        }
    }

    fn token(&self, at: usize) -> Option<&'a Token> {
        self.tokens.get(at).map(|&(_, t)| t)
    }

    fn declare(&mut self, at: usize, name: String, category: IdentifierCategory) {
        self.declare_at(at, name, category, None);
    }

    fn declare_at(
        &mut self,
        at: usize,
        name: String,
        category: IdentifierCategory,
        position: Option<StoragePosition>,
    ) {
        let Some(&(line, tok)) = self.tokens.get(at) else {
            return;
        };
        let category = if has_system_prefix(&name) {
            IdentifierCategory::SystemReserved
        } else {
            category
        };
        trace!(name = %name, category = %category, line, "declaration");
        self.out.declarations.push(Declaration {
            name,
            category,
            line,
            column: source_column(tok.column),
            position,
        });
    }

    fn run(mut self) -> Classification {
        while let Some(tok) = self.token(self.pos) {
            let at_start = std::mem::take(&mut self.ctx.sentence_start);

            if tok.is_period() {
                self.ctx.sentence_start = true;
                self.pos += 1;
            } else if self.division_header() || self.section_header() {
                // Consumed.
            } else if tok.is_word("PROGRAM-ID") {
                self.program_id();
            } else if tok.is_word("COPY") || tok.is_word("INCLUDE") {
                self.include();
            } else if tok.is_word("EXEC") {
                self.embedded_block();
            } else if tok.is_word("SELECT") {
                self.select();
            } else if tok.is_word("FD") || tok.is_word("SD") {
                self.file_description();
            } else if let Some(level) = level_number(tok).filter(|_| {
                at_start && self.ctx.region != Region::Executable
            }) {
                self.data_entry(level);
            } else if at_start && self.ctx.region == Region::Executable && self.is_paragraph() {
                let name = tok.text.clone();
                self.declare(self.pos, name, IdentifierCategory::ParagraphName);
                self.pos += 1;
            } else {
                self.pos += 1;
            }
        }
        self.out
    }

    // ─── Headers ───────────────────────────────────────────────────────

    fn division_header(&mut self) -> bool {
        let (Some(tok), Some(next)) = (self.token(self.pos), self.token(self.pos + 1)) else {
            return false;
        };
        if !next.is_word("DIVISION") {
            return false;
        }
        let region = if tok.is_word("DATA") {
            Region::LayoutDefinition
        } else if tok.is_word("PROCEDURE") {
            Region::Executable
        } else {
            Region::Header
        };
        self.ctx.region = region;
        self.ctx.section = None;
        self.ctx.file_description = false;
        self.layout.close_all();
        self.pos += 2;
        true
    }

    fn section_header(&mut self) -> bool {
        let (Some(tok), Some(next)) = (self.token(self.pos), self.token(self.pos + 1)) else {
            return false;
        };
        if !next.is_word("SECTION") {
            return false;
        }
        match self.ctx.region {
            Region::Executable if tok.kind == TokenKind::Identifier => {
                let name = tok.text.clone();
                self.declare(self.pos, name, IdentifierCategory::SectionName);
            }
            Region::LayoutDefinition | Region::Header => {
                if let Some(section) = DataSection::from_word(tok) {
                    self.ctx.section = Some(section);
                    self.ctx.file_description = false;
                    self.layout.close_all();
                }
            }
            Region::Executable => {}
        }
        self.pos += 2;
        true
    }

    fn is_paragraph(&self) -> bool {
        let Some(tok) = self.token(self.pos) else {
            return false;
        };
        tok.kind == TokenKind::Identifier
            && (tok.column as usize) < AREA_A_WIDTH
            && self.token(self.pos + 1).is_some_and(Token::is_period)
    }

    // ─── Statements ────────────────────────────────────────────────────

    fn program_id(&mut self) {
        self.pos += 1;
        if self.token(self.pos).is_some_and(Token::is_period) {
            self.pos += 1;
        }
        if let Some(name) = self.token(self.pos).and_then(name_text) {
            self.declare(self.pos, name, IdentifierCategory::ProgramName);
            self.pos += 1;
        }
    }

    fn include(&mut self) {
        self.pos += 1;
        if let Some(name) = self.token(self.pos).and_then(name_text) {
            if !is_system_fragment(&name) {
                self.declare(self.pos, name, IdentifierCategory::IncludedFragmentName);
            }
            self.pos += 1;
        }
    }

    /// Skip an `EXEC ... END-EXEC` block, honoring `INCLUDE` inside it.
    fn embedded_block(&mut self) {
        self.pos += 1;
        while let Some(tok) = self.token(self.pos) {
            if tok.is_word("END-EXEC") {
                self.pos += 1;
                return;
            }
            if tok.is_word("INCLUDE") {
                self.include();
            } else {
                self.pos += 1;
            }
        }
    }

    fn select(&mut self) {
        self.pos += 1;
        if self.token(self.pos).is_some_and(|t| t.is_word("OPTIONAL")) {
            self.pos += 1;
        }
        self.declare_identifier(IdentifierCategory::FileRecordName);
    }

    fn file_description(&mut self) {
        self.pos += 1;
        self.ctx.file_description = true;
        self.layout.close_all();
        self.declare_identifier(IdentifierCategory::FileRecordName);
    }

    fn declare_identifier(&mut self, category: IdentifierCategory) {
        if let Some(tok) = self
            .token(self.pos)
            .filter(|t| t.kind == TokenKind::Identifier)
        {
            self.declare(self.pos, tok.text.clone(), category);
            self.pos += 1;
        }
    }

    // ─── Data description entries ──────────────────────────────────────

    /// A data description entry starting at its level number. Stops before
    /// the terminating period.
    fn data_entry(&mut self, level: u8) {
        self.pos += 1;

        let name_at = match self.token(self.pos) {
            Some(tok) if tok.kind == TokenKind::Identifier => {
                self.pos += 1;
                Some(self.pos - 1)
            }
            Some(tok) if tok.is_word("FILLER") => {
                self.pos += 1;
                None
            }
            _ => None,
        };

        let clauses = self.entry_clauses();
        let name = name_at.and_then(|at| self.token(at)).map(|t| t.text.clone());
        let upper = name.as_ref().map(|n| n.to_ascii_uppercase());
        let target_upper = clauses
            .redefines
            .and_then(|at| self.token(at))
            .map(|t| t.text.to_ascii_uppercase());
        let target_position = target_upper
            .as_ref()
            .and_then(|t| self.positions.get(t))
            .cloned();

        let shape = EntryShape {
            level,
            name: upper.as_deref(),
            size: clauses.size,
            occurs: clauses.occurs,
            overlays: target_position.as_ref(),
        };
        let position = self.layout.place(&shape);
        let depth = self.layout.depth() - usize::from(position.is_some() && clauses.size.is_none());

        if let (Some(upper), Some(position)) = (&upper, &position) {
            self.positions.insert(upper.clone(), position.clone());
        }

        if let (Some(target), Some(at), Some(declared)) =
            (target_upper, clauses.redefines, position.clone())
        {
            if let Some(&(line, tok)) = self.tokens.get(at) {
                self.out.overlays.push(OverlayDeclaration {
                    overlay: upper.clone().unwrap_or_else(|| "FILLER".to_string()),
                    target,
                    nesting_depth: u32::try_from(depth).unwrap_or(u32::MAX),
                    declared,
                    target_position,
                    line,
                    column: source_column(tok.column),
                });
            }
        }

        if let (Some(at), Some(name)) = (name_at, name) {
            let category = if level == 88 {
                IdentifierCategory::ConditionName
            } else if clauses.external {
                IdentifierCategory::CrossProgramName
            } else if level == 1
                && self.ctx.section == Some(DataSection::File)
                && self.ctx.file_description
            {
                IdentifierCategory::FileRecordName
            } else {
                IdentifierCategory::DataName
            };
            self.declare_at(at, name, category, position);
        }

        for at in clauses.indexes {
            if let Some(tok) = self.token(at) {
                self.declare(at, tok.text.clone(), IdentifierCategory::IndexName);
            }
        }
    }

    fn entry_clauses(&mut self) -> EntryClauses {
        let mut clauses = EntryClauses {
            occurs: 1,
            ..EntryClauses::default()
        };
        while let Some(tok) = self.token(self.pos) {
            if tok.is_period() {
                break;
            }
            if tok.is_word("REDEFINES") {
                if self
                    .token(self.pos + 1)
                    .is_some_and(|t| t.kind == TokenKind::Identifier)
                {
                    clauses.redefines = Some(self.pos + 1);
                    self.pos += 1;
                }
            } else if tok.is_word("EXTERNAL") {
                clauses.external = true;
            } else if tok.is_word("OCCURS") {
                clauses.occurs = self.occurs_count();
                continue;
            } else if tok.is_word("INDEXED") {
                self.index_names(&mut clauses.indexes);
                continue;
            } else if tok.kind == TokenKind::LayoutDescriptor {
                clauses.size = elementary_size(&tok.text).or(clauses.size);
            }
            self.pos += 1;
        }
        clauses
    }

    /// `OCCURS n [TO m] [TIMES]`. The upper bound counts for storage.
    fn occurs_count(&mut self) -> u32 {
        self.pos += 1;
        let mut count = 1;
        if let Some(n) = self.token(self.pos).and_then(numeric) {
            count = n;
            self.pos += 1;
            if self.token(self.pos).is_some_and(|t| t.is_word("TO")) {
                if let Some(m) = self.token(self.pos + 1).and_then(numeric) {
                    count = m;
                    self.pos += 2;
                }
            }
        }
        if self.token(self.pos).is_some_and(|t| t.is_word("TIMES")) {
            self.pos += 1;
        }
        count
    }

    /// `INDEXED [BY] name [,] name ...`
    fn index_names(&mut self, out: &mut Vec<usize>) {
        self.pos += 1;
        if self.token(self.pos).is_some_and(|t| t.is_word("BY")) {
            self.pos += 1;
        }
        while let Some(tok) = self.token(self.pos) {
            match tok.kind {
                TokenKind::Identifier => out.push(self.pos),
                TokenKind::Punctuation if tok.text == "," => {}
                _ => break,
            }
            self.pos += 1;
        }
    }
}

#[derive(Debug, Default)]
struct EntryClauses {
    /// Token index of the `REDEFINES` target.
    redefines: Option<usize>,
    external: bool,
    occurs: u32,
    /// Size of an elementary item.
    size: Option<u32>,
    /// Token indexes of `INDEXED BY` names.
    indexes: Vec<usize>,
}

/// Level number of a data description entry.
fn level_number(tok: &Token) -> Option<u8> {
    if tok.kind != TokenKind::Literal || tok.text.len() > 2 {
        return None;
    }
    let level: u8 = tok.text.parse().ok()?;
    matches!(level, 1..=49 | 66 | 77 | 88).then_some(level)
}

fn numeric(tok: &Token) -> Option<u32> {
    if tok.kind != TokenKind::Literal {
        return None;
    }
    tok.text.parse().ok()
}

/// Size of an elementary item from its descriptor. A usage without a
/// picture describes a group, except for the usages that fix their own
/// size.
fn elementary_size(descriptor: &str) -> Option<u32> {
    let layout = LayoutDescriptor::parse(descriptor).ok()?;
    let self_sized = matches!(
        layout.usage(),
        Usage::Float4 | Usage::Float8 | Usage::Index | Usage::Pointer
    );
    (layout.picture().is_some() || self_sized).then(|| layout.storage_size())
}

/// A program or fragment name: a user word or a quoted literal.
fn name_text(tok: &Token) -> Option<String> {
    match tok.kind {
        TokenKind::Identifier => Some(tok.text.clone()),
        TokenKind::Literal => tok.literal_body().map(str::to_string),
        _ => None,
    }
}
