//! Renderer-neutral document tree.
//!
//! Helpers build these nodes; [`crate::render::docx`] serialises them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Paragraph spacing in twips; `line` is in 240ths of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParagraphSpacing {
    pub before: u32,
    pub after: u32,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    pub left: u32,
    pub hanging: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderBottom {
    pub color: String,
    /// Line width in eighths of a point.
    pub size: u32,
    /// Gap between text and rule, in points.
    pub space: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<String>,
    /// Half-points.
    pub size: Option<u32>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePlacement {
    Inline,
    /// Anchored relative to the page with square text wrapping. Offsets in pixels.
    Floating { offset_x: u32, offset_y: u32 },
}

/// Reference to the document logo; the bytes live on the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRun {
    pub width_px: u32,
    pub height_px: u32,
    pub placement: ImagePlacement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(Run),
    Image(ImageRun),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
    pub alignment: Alignment,
    pub spacing: ParagraphSpacing,
    pub indent: Option<Indent>,
    /// Solid background fill colour.
    pub shading: Option<String>,
    pub border_bottom: Option<BorderBottom>,
    pub keep_next: bool,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(mut self, run: Run) -> Self {
        self.inlines.push(Inline::Text(run));
        self
    }

    pub fn image(mut self, image: ImageRun) -> Self {
        self.inlines.push(Inline::Image(image));
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing.before = before;
        self.spacing.after = after;
        self
    }

    pub fn line_spacing(mut self, line: Option<u32>) -> Self {
        self.spacing.line = line;
        self
    }

    pub fn indent(mut self, left: u32, hanging: u32) -> Self {
        self.indent = Some(Indent { left, hanging });
        self
    }

    pub fn shading(mut self, fill: &str) -> Self {
        self.shading = Some(fill.to_string());
        self
    }

    pub fn border_bottom(mut self, color: &str, size: u32) -> Self {
        self.border_bottom = Some(BorderBottom {
            color: color.to_string(),
            size,
            space: 1,
        });
        self
    }

    pub fn keep_next(mut self) -> Self {
        self.keep_next = true;
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.inlines
            .iter()
            .filter_map(|inline| match inline {
                Inline::Text(run) => Some(run.text.as_str()),
                Inline::Image(_) => None,
            })
            .collect()
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.inlines.iter().filter_map(|inline| match inline {
            Inline::Text(run) => Some(run),
            Inline::Image(_) => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageRun> {
        self.inlines.iter().filter_map(|inline| match inline {
            Inline::Image(image) => Some(image),
            Inline::Text(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Share of the table width, in percent.
    pub width_pct: u32,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
    pub borderless: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    PageBreak,
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Block::Paragraph(p)
    }
}

impl Block {
    pub fn is_page_break(&self) -> bool {
        matches!(self, Block::PageBreak)
    }

    /// All text carried by this block, table cells included.
    pub fn text(&self) -> String {
        match self {
            Block::Paragraph(p) => p.text(),
            Block::Table(t) => t
                .rows
                .iter()
                .flat_map(|row| row.cells.iter())
                .flat_map(|cell| cell.paragraphs.iter())
                .map(Paragraph::text)
                .collect::<Vec<_>>()
                .join("\n"),
            Block::PageBreak => String::new(),
        }
    }

    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        match self {
            Block::Paragraph(p) => vec![p],
            Block::Table(t) => t
                .rows
                .iter()
                .flat_map(|row| row.cells.iter())
                .flat_map(|cell| cell.paragraphs.iter())
                .collect(),
            Block::PageBreak => vec![],
        }
    }
}
