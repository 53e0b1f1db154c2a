use crossterm::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub string: Color,
    pub number: Color,
    pub function: Color,
    pub type_name: Color, // Cyan for type names
    pub address: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb { r: 205, g: 214, b: 244 },
    primary: Color::Rgb { r: 137, g: 180, b: 250 },
    secondary: Color::Rgb { r: 250, g: 179, b: 135 },
    comment: Color::Rgb { r: 108, g: 112, b: 134 },
    success: Color::Rgb { r: 166, g: 227, b: 161 },
    error: Color::Rgb { r: 243, g: 139, b: 168 },
    string: Color::Rgb { r: 250, g: 179, b: 135 },   // Orange for strings
    number: Color::Rgb { r: 250, g: 179, b: 135 },   // Orange for numbers
    function: Color::Rgb { r: 249, g: 226, b: 175 }, // Yellow for functions
    type_name: Color::Rgb { r: 148, g: 226, b: 213 },
    address: Color::Rgb { r: 245, g: 194, b: 231 }, // Pink for addresses
};
