//! Comparação de medições pareadas (e.g. latências de duas estratégias de
//! roteamento) e agrupamento em histograma.
//!
//! Cada arquivo contém inteiros separados por espaço em branco; a linha `i`
//! e a coluna `j` de um arquivo correspondem à mesma medição no outro.

mod dataset;
mod histogram;
mod stats;

pub use dataset::{CompareError, load_pair, load_values, parse_pair, parse_values};
pub use histogram::{Bin, Histogram};
pub use stats::{Comparison, Summary, differences, mean, stdev};
