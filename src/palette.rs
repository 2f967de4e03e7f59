use std::fmt;

use tracing::debug;

use crate::tree::CategoryTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `rgba(r,g,b,alpha)` as plotly and CSS expect it.
    pub fn rgba(&self, alpha: f64) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Neutral color for nodes that never got one.
pub const UNASSIGNED: Color = Color::rgb(0x80, 0x80, 0x80);

pub const PALETTE: [Color; 15] = [
    Color::rgb(0x4E, 0x79, 0xA7), // blue
    Color::rgb(0xF2, 0x8E, 0x2B), // orange
    Color::rgb(0xE1, 0x57, 0x59), // red
    Color::rgb(0x76, 0xB7, 0xB2), // teal
    Color::rgb(0x59, 0xA1, 0x4F), // green
    Color::rgb(0xED, 0xC9, 0x48), // yellow
    Color::rgb(0xB0, 0x7A, 0xA1), // purple
    Color::rgb(0xFF, 0x9D, 0xA7), // pink
    Color::rgb(0x9C, 0x75, 0x5F), // brown
    Color::rgb(0xBA, 0xB0, 0xAC), // gray
    Color::rgb(0x8C, 0xD1, 0x7D), // lime green
    Color::rgb(0xFF, 0x9F, 0x80), // salmon
    Color::rgb(0xA0, 0xCB, 0xE8), // light blue
    Color::rgb(0xC9, 0xC9, 0xC9), // light gray
    Color::rgb(0xD3, 0x72, 0x95), // rose
];

/// Round-robin over [`PALETTE`]. One assigner per run keeps coloring
/// reproducible.
#[derive(Debug, Default)]
pub struct ColorAssigner {
    cursor: usize,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick(&mut self) -> Color {
        let color = PALETTE[self.cursor];
        self.cursor = (self.cursor + 1) % PALETTE.len();
        color
    }

    /// Colors each root in path order and copies that color onto its
    /// whole subtree, overwriting whatever was there.
    pub fn assign(&mut self, tree: &mut CategoryTree) {
        let roots: Vec<_> = tree.roots().collect();
        for root in &roots {
            let color = self.pick();
            for id in tree.subtree(*root) {
                if let Some(node) = tree.get_mut(id) {
                    node.color = Some(color);
                }
            }
        }
        debug!(roots = roots.len(), "assigned category colors");
    }
}
