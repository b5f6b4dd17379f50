use crate::genotype::GenotypeTuple;
use crate::index::GenotypeIndex;
use ahash::{HashMap, HashMapExt};
use itertools::Itertools;
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ColorShare {
    pub label: String,
    pub count: usize,
    /// fraction of matched subjects, in [0, 1]
    pub share: f64,
}

/// Eye colors among reference subjects sharing one genotype tuple.
///
/// Entries are ordered by count, largest first; equal counts keep the order
/// in which the labels were first seen.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ColorDistribution {
    pub genotype: GenotypeTuple,
    /// subjects sharing `genotype`
    pub total: usize,
    /// subjects in the whole index
    pub reference_total: usize,
    pub shares: Vec<ColorShare>,
}

impl ColorDistribution {
    /// Look up `genotype` in `index`; no match is an empty distribution.
    pub fn from_index(index: &GenotypeIndex, genotype: &GenotypeTuple) -> Self {
        let labels = index.colors(genotype).unwrap_or_default();
        Self::from_labels(genotype.clone(), labels, index.nsubjects())
    }

    /// Tally `labels`, the colors of the subjects sharing `genotype` out of
    /// `reference_total` indexed subjects.
    pub fn from_labels(genotype: GenotypeTuple, labels: &[String], reference_total: usize) -> Self {
        let mut first_seen = HashMap::<&str, usize>::new();
        let mut tally: Vec<(&str, usize)> = vec![];
        for label in labels {
            match first_seen.get(label.as_str()) {
                Some(&i) => tally[i].1 += 1,
                None => {
                    first_seen.insert(label.as_str(), tally.len());
                    tally.push((label.as_str(), 1));
                }
            }
        }
        let total = labels.len();
        // sorted_by_key is stable
        let shares = tally
            .into_iter()
            .sorted_by_key(|(_, n)| Reverse(*n))
            .map(|(label, count)| ColorShare {
                label: label.to_owned(),
                count,
                share: count as f64 / total as f64,
            })
            .collect();
        Self {
            genotype,
            total,
            reference_total,
            shares,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl fmt::Display for ColorDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(
                f,
                "No reference subject shares genotype {} (0 of {}).",
                self.genotype, self.reference_total
            );
        }
        writeln!(
            f,
            "{} of {} reference subjects share genotype {}:",
            self.total, self.reference_total, self.genotype
        )?;
        let width = self
            .shares
            .iter()
            .map(|x| x.label.chars().count())
            .max()
            .unwrap_or(0);
        for s in &self.shares {
            writeln!(
                f,
                "  {:<width$}  {:>6.2}%  ({})",
                s.label,
                s.share * 100.0,
                s.count
            )?;
        }
        Ok(())
    }
}

/// Personal genotypes followed by the eye color breakdown, as printed to the console
pub fn render_text(personal: &GenotypeTuple, dist: &ColorDistribution) -> String {
    let mut s = String::new();
    for (snp, gt) in personal.iter_snps() {
        s.push_str(&format!("{snp}: {gt}\n"));
    }
    s.push('\n');
    s.push_str(&dist.to_string());
    s
}

#[derive(Serialize)]
struct JsonReport<'a> {
    genotypes: Vec<(&'static str, &'a str)>,
    distribution: &'a ColorDistribution,
}

pub fn render_json(
    personal: &GenotypeTuple,
    dist: &ColorDistribution,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        genotypes: personal.iter_snps().collect(),
        distribution: dist,
    })
}
