/// Intervalo `[start, end)` com a contagem de valores que caem nele.
/// O último bin do histograma é fechado em `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// `floor(sqrt(n))` bins de mesma largura cobrindo `[min, max]`.
    /// Se todos os valores forem iguais, o intervalo vira `[v - 0.5, v + 0.5]`.
    pub fn new(values: &[i64]) -> Self {
        let bin_count = (values.len() as f64).sqrt() as usize;
        let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
            return Self::default();
        };
        if bin_count == 0 {
            return Self::default();
        }

        let (lo, hi) = if min == max {
            (min as f64 - 0.5, max as f64 + 0.5)
        } else {
            (min as f64, max as f64)
        };
        let width = (hi - lo) / bin_count as f64;

        let mut bins: Vec<Bin> = (0..bin_count)
            .map(|i| Bin {
                start: lo + width * i as f64,
                end: if i + 1 == bin_count {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v as f64 - lo) / width) as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}
