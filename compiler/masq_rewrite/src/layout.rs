//! Storage positions of data items inside their records.
//!
//! Levels 01 and 77 open a record at offset 0. Elementary items advance the
//! cursor by their size times their repeat count. Groups stay open until an
//! entry with the same or a lower level arrives; a group with a repeat count
//! multiplies its extent when it closes. An overlay starts at its target's
//! position and puts the cursor back where it was when it closes.

/// Byte offset of a data item inside its level-01/77 record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoragePosition {
    /// Upper-cased name of the enclosing record.
    pub record: String,
    pub offset: u32,
}

impl StoragePosition {
    pub fn new(record: impl Into<String>, offset: u32) -> Self {
        StoragePosition {
            record: record.into(),
            offset,
        }
    }
}

/// Shape of one data description entry, as far as storage is concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryShape<'a> {
    pub level: u8,
    /// Upper-cased name, or `None` for fillers.
    pub name: Option<&'a str>,
    /// Size of an elementary item. `None` for groups.
    pub size: Option<u32>,
    pub occurs: u32,
    /// Position of the overlaid item, when the entry redefines one.
    pub overlays: Option<&'a StoragePosition>,
}

#[derive(Clone, Debug)]
struct OpenGroup {
    level: u8,
    start: u32,
    occurs: u32,
    restore: Option<u32>,
}

/// Running storage cursor over the entries of one file.
#[derive(Clone, Debug, Default)]
pub struct StorageLayout {
    record: String,
    cursor: u32,
    open: Vec<OpenGroup>,
}

impl StorageLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups enclosing the next entry.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Place an entry and return its position. Levels 66 and 88 occupy no
    /// storage and get `None`.
    pub fn place(&mut self, entry: &EntryShape<'_>) -> Option<StoragePosition> {
        if matches!(entry.level, 66 | 88) {
            return None;
        }

        self.close_to(entry.level);
        if matches!(entry.level, 1 | 77) {
            self.close_all();
            self.cursor = 0;
            self.record = match entry.overlays {
                Some(target) => target.record.clone(),
                None => entry.name.unwrap_or("FILLER").to_string(),
            };
        }

        let (start, restore) = match entry.overlays {
            Some(target) if target.record == self.record => (target.offset, Some(self.cursor)),
            _ => (self.cursor, None),
        };
        let position = StoragePosition::new(self.record.clone(), start);

        match entry.size {
            Some(size) => {
                self.cursor = start.saturating_add(size.saturating_mul(entry.occurs.max(1)));
                if let Some(restore) = restore {
                    self.cursor = restore;
                }
            }
            None => {
                self.cursor = start;
                self.open.push(OpenGroup {
                    level: entry.level,
                    start,
                    occurs: entry.occurs.max(1),
                    restore,
                });
            }
        }
        Some(position)
    }

    /// Close every open group. Called at section boundaries.
    pub fn close_all(&mut self) {
        self.close_to(0);
    }

    fn close_to(&mut self, level: u8) {
        while self.open.last().is_some_and(|g| g.level >= level) {
            let Some(group) = self.open.pop() else {
                break;
            };
            let extent = self.cursor.saturating_sub(group.start);
            self.cursor = group
                .start
                .saturating_add(extent.saturating_mul(group.occurs));
            if let Some(restore) = group.restore {
                self.cursor = restore;
            }
        }
    }
}
