use serde::Deserialize;

/// Sequential colormaps for the altitude-coloured track, sampled at five
/// evenly spaced stops and interpolated linearly in RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    #[serde(alias = "Viridis")]
    Viridis,
    #[serde(alias = "Plasma")]
    Plasma,
    #[serde(alias = "Greys")]
    Greys,
    #[serde(alias = "Greys_r")]
    GreysR,
}

const VIRIDIS: [[u8; 3]; 5] = [
    [0x44, 0x01, 0x54],
    [0x3b, 0x52, 0x8b],
    [0x21, 0x91, 0x8c],
    [0x5e, 0xc9, 0x62],
    [0xfd, 0xe7, 0x25],
];

const PLASMA: [[u8; 3]; 5] = [
    [0x0d, 0x08, 0x87],
    [0x7e, 0x03, 0xa8],
    [0xcc, 0x47, 0x78],
    [0xf8, 0x95, 0x40],
    [0xf0, 0xf9, 0x21],
];

const GREYS: [[u8; 3]; 5] = [
    [0xff, 0xff, 0xff],
    [0xd9, 0xd9, 0xd9],
    [0x96, 0x96, 0x96],
    [0x52, 0x52, 0x52],
    [0x00, 0x00, 0x00],
];

impl Colormap {
    /// Colour at `frac` in `0.0..=1.0`; values outside are clamped.
    pub fn rgb(self, frac: f64) -> [u8; 3] {
        let (stops, frac) = match self {
            Colormap::Viridis => (&VIRIDIS, frac),
            Colormap::Plasma => (&PLASMA, frac),
            Colormap::Greys => (&GREYS, frac),
            Colormap::GreysR => (&GREYS, 1.0 - frac),
        };

        let pos = frac.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let t = pos - i as f64;

        let mut out = [0u8; 3];
        for (c, o) in out.iter_mut().enumerate() {
            let a = stops[i][c] as f64;
            let b = stops[i + 1][c] as f64;
            *o = (a + (b - a) * t).round() as u8;
        }
        out
    }

    pub fn hex(self, frac: f64) -> String {
        let [r, g, b] = self.rgb(frac);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}
