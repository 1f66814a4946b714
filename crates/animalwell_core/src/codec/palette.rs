pub type Rgb = [u8; 3];

/// How "closest colour" is measured when a pixel matches no palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDistance {
    /// Weighted RGB distance with red-mean correction.
    #[default]
    Redmean,
    /// Plain sum of squared channel differences.
    Euclidean,
}

impl ColorDistance {
    pub fn measure(self, a: Rgb, b: Rgb) -> f64 {
        let dr = f64::from(a[0]) - f64::from(b[0]);
        let dg = f64::from(a[1]) - f64::from(b[1]);
        let db = f64::from(a[2]) - f64::from(b[2]);
        match self {
            Self::Redmean => {
                let rbar = (f64::from(a[0]) + f64::from(b[0])) * 0.5;
                (2.0 + rbar / 256.0) * dr * dr
                    + 4.0 * dg * dg
                    + (2.0 + (255.0 - rbar) / 256.0) * db * db
            }
            Self::Euclidean => dr * dr + dg * dg + db * db,
        }
    }
}

/// Ordered colour table; a pixel's stored value is its index here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }

    /// Bunny mural colours: black, blue, red, white.
    pub fn mural() -> Self {
        Self::new(vec![
            [0x0A, 0x14, 0x32],
            [0x64, 0xC8, 0xFF],
            [0xFA, 0x64, 0x64],
            [0xFF, 0xE6, 0xC8],
        ])
    }

    /// Minimap layers: unset pixels black, set pixels white.
    pub fn monochrome() -> Self {
        Self::new(vec![[0x00, 0x00, 0x00], [0xFF, 0xFF, 0xFF]])
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Index of the entry closest to `rgb`. An exact match always wins;
    /// otherwise ties go to the earliest entry.
    pub fn nearest(&self, rgb: Rgb, distance: ColorDistance) -> u8 {
        if let Some(index) = self.colors.iter().position(|color| *color == rgb) {
            return index as u8;
        }
        let mut best = 0usize;
        let mut best_distance = f64::INFINITY;
        for (index, color) in self.colors.iter().enumerate() {
            let d = distance.measure(rgb, *color);
            if d < best_distance {
                best = index;
                best_distance = d;
            }
        }
        best as u8
    }

    /// Flat `r, g, b, r, g, b, ...` bytes, as PNG `PLTE` wants them.
    pub fn to_flat(&self) -> Vec<u8> {
        self.colors.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins() {
        let palette = Palette::mural();
        assert_eq!(palette.nearest([0xFA, 0x64, 0x64], ColorDistance::Redmean), 2);
        assert_eq!(palette.nearest([0xFF, 0xE6, 0xC8], ColorDistance::Euclidean), 3);
    }

    #[test]
    fn ties_resolve_to_first_entry() {
        let palette = Palette::new(vec![[0, 0, 0], [0, 2, 0]]);
        assert_eq!(palette.nearest([0, 1, 0], ColorDistance::Redmean), 0);
        assert_eq!(palette.nearest([0, 1, 0], ColorDistance::Euclidean), 0);

        let reversed = Palette::new(vec![[0, 2, 0], [0, 0, 0]]);
        assert_eq!(reversed.nearest([0, 1, 0], ColorDistance::Redmean), 0);
    }

    #[test]
    fn near_colours_project_onto_mural_palette() {
        let palette = Palette::mural();
        assert_eq!(palette.nearest([0x60, 0xC0, 0xF0], ColorDistance::Redmean), 1);
        assert_eq!(palette.nearest([0x00, 0x00, 0x00], ColorDistance::Redmean), 0);
        assert_eq!(palette.nearest([0xF0, 0x50, 0x50], ColorDistance::Euclidean), 2);
    }
}
