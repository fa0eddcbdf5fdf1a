//! Block tags and the mnemonic-to-tag encoding
//!
//! Tags are 64-bit integers built from up-to-8-character mnemonics. The bytes
//! are copied verbatim in memory order; short mnemonics are padded with `-`
//! and the eighth byte becomes `\n`.

/// Pack a mnemonic into a 64-bit block tag
///
/// Characters after the eighth, or after an embedded NUL, are ignored. The
/// empty tag `0` can never be produced.
pub const fn tag_value(text: &str) -> u64 {
    let src = text.as_bytes();
    let mut bytes = [0u8; 8];
    let mut i = 0;
    while i < 8 && i < src.len() && src[i] != 0 {
        bytes[i] = src[i];
        i += 1;
    }
    while i < 8 {
        bytes[i] = if i == 7 { b'\n' } else { b'-' };
        i += 1;
    }
    u64::from_ne_bytes(bytes)
}

/// The raw bytes of a tag, in the order they appear in the file
pub const fn tag_text(tag: u64) -> [u8; 8] {
    tag.to_ne_bytes()
}

pub const TAG_IGAFILE: u64 = tag_value("IGAFILE");
pub const TAG_SRFTYPE: u64 = tag_value("SRFTYPE");
pub const TAG_VECDICT: u64 = tag_value("VECDICT");
pub const TAG_PT3DW: u64 = tag_value("PT3DW");
pub const TAG_2DPIECE: u64 = tag_value("2DPIECE");
pub const TAG_LAYOUT: u64 = tag_value("LAYOUT");
pub const TAG_EDGES: u64 = tag_value("EDGES");
pub const TAG_KNOTINT: u64 = tag_value("KNOTINT");
pub const TAG_SHAPE: u64 = tag_value("SHAPE");

/// Structured blocks understood by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Surface type label bytes
    SurfaceType,
    /// Coefficient dictionary (f64)
    Coeffs,
    /// Control points
    Points,
    /// Pieces
    Pieces,
    /// Face layouts
    Layouts,
    /// Edge adjacency (u32)
    Edges,
    /// Knot intervals (f64)
    Intervals,
    /// Elements
    Elems,
}

impl BlockKind {
    /// Every structured block, in the order the writer emits them
    pub const ALL: [BlockKind; 8] = [
        BlockKind::SurfaceType,
        BlockKind::Coeffs,
        BlockKind::Points,
        BlockKind::Pieces,
        BlockKind::Layouts,
        BlockKind::Edges,
        BlockKind::Intervals,
        BlockKind::Elems,
    ];

    /// Look up the block kind for a tag; `None` for unknown blocks
    pub const fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            TAG_SRFTYPE => Some(BlockKind::SurfaceType),
            TAG_VECDICT => Some(BlockKind::Coeffs),
            TAG_PT3DW => Some(BlockKind::Points),
            TAG_2DPIECE => Some(BlockKind::Pieces),
            TAG_LAYOUT => Some(BlockKind::Layouts),
            TAG_EDGES => Some(BlockKind::Edges),
            TAG_KNOTINT => Some(BlockKind::Intervals),
            TAG_SHAPE => Some(BlockKind::Elems),
            _ => None,
        }
    }

    /// Short mnemonic used to build the tag
    pub const fn mnemonic(self) -> &'static str {
        match self {
            BlockKind::SurfaceType => "SRFTYPE",
            BlockKind::Coeffs => "VECDICT",
            BlockKind::Points => "PT3DW",
            BlockKind::Pieces => "2DPIECE",
            BlockKind::Layouts => "LAYOUT",
            BlockKind::Edges => "EDGES",
            BlockKind::Intervals => "KNOTINT",
            BlockKind::Elems => "SHAPE",
        }
    }

    /// The 64-bit tag for this block
    pub const fn tag(self) -> u64 {
        tag_value(self.mnemonic())
    }
}

impl core::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
