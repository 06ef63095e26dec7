use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub function: Color,
    pub type_name: Color, // Cyan for container summaries
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    keyword: Color::Rgb(137, 180, 250),   // Blue for labels
    string: Color::Rgb(166, 227, 161),    // Green for strings
    number: Color::Rgb(250, 179, 135),    // Orange for numbers
    function: Color::Rgb(249, 226, 175),  // Yellow for the root name
    type_name: Color::Rgb(148, 226, 213), // Cyan/teal for summaries
};
