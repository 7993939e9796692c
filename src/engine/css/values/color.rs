//! CSS color values
//! (`color`, `background-color`, `border-color`)

/// RGBA（各 0–255）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Default for Color {
    fn default() -> Self {
        Color::BLACK // デフォルトは不透明な黒
    }
}

impl Color {
    pub const BLACK: Color = Color(0, 0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255, 255);
    pub const BLUE: Color = Color(0, 0, 255, 255);
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color(r, g, b, 255)
    }

    pub fn is_transparent(&self) -> bool {
        self.3 == 0
    }

    /// u8 RGBA -> [f32; 4] RGBA (0.0~1.0)
    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            self.3 as f32 / 255.0,
        ]
    }

    /// 宣言値（空白区切りで再構成された文字列）から色を得る
    pub fn parse(value: &str) -> Option<Color> {
        let value = value.trim();
        if value.starts_with('#') {
            Self::from_hex(value)
        } else if let Some(args) = function_args(value, "rgba").or_else(|| function_args(value, "rgb")) {
            Self::from_rgb_args(&args)
        } else {
            Self::from_named(value)
        }
    }

    pub fn from_named(name: &str) -> Option<Color> {
        // NOTE: CSS のキーワードは大文字小文字を区別しない
        match name.to_ascii_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "red" => Some(Color::rgb(255, 0, 0)),
            "green" => Some(Color::rgb(0, 128, 0)),
            "blue" => Some(Color::BLUE),
            "yellow" => Some(Color::rgb(255, 255, 0)),
            "gray" | "grey" => Some(Color::rgb(128, 128, 128)),
            "lightgray" | "lightgrey" => Some(Color::rgb(211, 211, 211)),
            "darkgray" | "darkgrey" => Some(Color::rgb(169, 169, 169)),
            "silver" => Some(Color::rgb(192, 192, 192)),
            "navy" => Some(Color::rgb(0, 0, 128)),
            "orange" => Some(Color::rgb(255, 165, 0)),
            "pink" => Some(Color::rgb(255, 192, 203)),
            "purple" => Some(Color::rgb(128, 0, 128)),
            "brown" => Some(Color::rgb(165, 42, 42)),
            "transparent" => Some(Color::TRANSPARENT),
            _ => None,
        }
    }

    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Color(r, g, b, a))
            }
            _ => None,
        }
    }

    fn from_rgb_args(args: &[&str]) -> Option<Color> {
        let channel = |s: &str| -> Option<u8> {
            let v = s.trim().parse::<f32>().ok()?;
            Some(v.round().clamp(0.0, 255.0) as u8)
        };
        match args {
            [r, g, b] => Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?)),
            [r, g, b, a] => {
                let alpha = a.trim().parse::<f32>().ok()?;
                Some(Color(
                    channel(r)?,
                    channel(g)?,
                    channel(b)?,
                    (alpha * 255.0).round().clamp(0.0, 255.0) as u8,
                ))
            }
            _ => None,
        }
    }
}

/// `name(a,b,c)` の引数部分を取り出す
fn function_args<'a>(value: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let lower = value.to_ascii_lowercase();
    if !lower.starts_with(name) {
        return None;
    }
    let inner = value[name.len()..].trim_start().strip_prefix('(')?.strip_suffix(')')?;
    Some(
        inner
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}
