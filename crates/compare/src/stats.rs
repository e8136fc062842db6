use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

/// Média aritmética; 0 para uma lista vazia.
pub fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

/// Desvio padrão amostral (denominador `n - 1`); 0 com menos de dois valores.
pub fn stdev(values: &[i64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|&v| (v as f64 - avg).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

/// `a - b` para cada par com lados diferentes. Pares cuja diferença não
/// cabe em i64 são ignorados.
pub fn differences(pairs: &[(i64, i64)]) -> Vec<i64> {
    pairs
        .iter()
        .filter(|(a, b)| a != b)
        .filter_map(|&(a, b)| difference(a, b))
        .collect()
}

fn difference(a: i64, b: i64) -> Option<i64> {
    let diff = a.checked_sub(b);
    if diff.is_none() {
        debug!(a, b, "par ignorado: diferença fora do intervalo de i64");
    }
    diff
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub stdev: f64,
}

impl Summary {
    pub fn of(values: &[i64]) -> Self {
        Self {
            count: values.len(),
            mean: mean(values),
            stdev: stdev(values),
        }
    }
}

/// Resultado de comparar dois conjuntos pareados.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub same: usize,
    /// `a - b` dos pares em que `a > b` (positivos).
    pub better: Vec<i64>,
    /// `a - b` dos pares em que `a < b` (negativos).
    pub worse: Vec<i64>,
    pub values_a: Vec<i64>,
    pub values_b: Vec<i64>,
}

impl Comparison {
    pub fn from_pairs(pairs: &[(i64, i64)]) -> Self {
        let mut cmp = Comparison::default();
        for &(a, b) in pairs {
            match a.cmp(&b) {
                Ordering::Equal => cmp.same += 1,
                ordering => {
                    let Some(diff) = difference(a, b) else {
                        continue;
                    };
                    if ordering == Ordering::Greater {
                        cmp.better.push(diff);
                    } else {
                        cmp.worse.push(diff);
                    }
                }
            }
            cmp.values_a.push(a);
            cmp.values_b.push(b);
        }
        cmp
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let better = Summary::of(&self.better);
        let worse = Summary::of(&self.worse);
        let a = Summary::of(&self.values_a);
        let b = Summary::of(&self.values_b);

        // `{:?}` mantém o ponto decimal em floats inteiros (1.0, não 1)
        writeln!(f, "Same: {}", self.same)?;
        writeln!(
            f,
            "Better: Count: {} Mean: {:?} Stdev: {:?}",
            better.count, better.mean, better.stdev
        )?;
        writeln!(
            f,
            "Worse: Count: {} Mean: {:?} Stdev: {:?}",
            worse.count, worse.mean, worse.stdev
        )?;
        writeln!(f, "Val1: Mean: {:?} Stdev: {:?}", a.mean, a.stdev)?;
        write!(f, "Val2: Mean: {:?} Stdev: {:?}", b.mean, b.stdev)
    }
}
