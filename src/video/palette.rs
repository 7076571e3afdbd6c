/// The four DMG shades, lightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    White,
    LightGray,
    DarkGray,
    Black,
}
