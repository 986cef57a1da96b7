/*
messages.rs

Copyright 2025 Hervé Quatremain

This file is part of Dronepath.

Dronepath is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Dronepath is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Dronepath. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Diagnostic messages in English and Portuguese.

use clap::ValueEnum;
use formatx::formatx;
use serde::{Deserialize, Serialize};

use crate::report::Violation;

/// Language of the diagnostic messages.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    #[default]
    En,
    Pt,
}

/// Message templates for a language.
struct Catalog {
    malformed_row: &'static str,
    overflight: &'static str,
    isolated: &'static str,
    wrong_path: &'static str,
    valid: &'static str,
    invalid: &'static str,
}

const EN: Catalog = Catalog {
    malformed_row: "Invalid instance: line {line} has {found} values instead of {expected}",
    overflight: "The drone cannot fly over position ({x},{y}): altitude {altitude} is above the ceiling",
    isolated: "Movement from position ({x},{y}) is isolated",
    wrong_path: "Wrong path at position ({x},{y}): expected step {expected}, found {found}",
    valid: "Valid path: target reached in {steps} steps",
    invalid: "Invalid path: {count} violation(s)",
};

const PT: Catalog = Catalog {
    malformed_row: "Instância inválida: a linha {line} tem {found} valores em vez de {expected}",
    overflight: "O drone não pode sobrevoar na posição ({x},{y}): altitude {altitude} acima do teto",
    isolated: "Movimento da posição ({x},{y}) está isolado!",
    wrong_path: "Caminho errado na posição ({x},{y}): passo esperado {expected}, encontrado {found}",
    valid: "Caminho válido: destino alcançado em {steps} passos",
    invalid: "Caminho inválido: {count} violação(ões)",
};

impl Locale {
    fn catalog(self) -> &'static Catalog {
        match self {
            Locale::En => &EN,
            Locale::Pt => &PT,
        }
    }

    /// Return the message for the given violation.
    pub fn violation(self, violation: &Violation) -> String {
        let c: &Catalog = self.catalog();
        let ret = match violation {
            Violation::MalformedRow {
                line,
                expected,
                found,
            } => formatx!(
                c.malformed_row.to_string(),
                line = line,
                found = found,
                expected = expected
            ),
            Violation::Overflight { cell, altitude } => formatx!(
                c.overflight.to_string(),
                x = cell.x,
                y = cell.y,
                altitude = altitude
            ),
            Violation::Isolated { cell } => {
                formatx!(c.isolated.to_string(), x = cell.x, y = cell.y)
            }
            Violation::WrongPath {
                cell,
                expected,
                found,
            } => formatx!(
                c.wrong_path.to_string(),
                x = cell.x,
                y = cell.y,
                expected = expected,
                found = found
            ),
        };
        // The templates are constants, so formatting only fails on a typo in a template
        ret.unwrap_or_else(|_| format!("{violation:?}"))
    }

    /// Return the summary line for a validation run.
    pub fn summary(self, valid: bool, steps: usize, count: usize) -> String {
        let c: &Catalog = self.catalog();
        let ret = if valid {
            formatx!(c.valid.to_string(), steps = steps)
        } else {
            formatx!(c.invalid.to_string(), count = count)
        };
        ret.unwrap_or_else(|_| {
            if valid {
                c.valid.to_string()
            } else {
                c.invalid.to_string()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coordinate;

    #[test]
    fn english_messages() {
        let v: Violation = Violation::WrongPath {
            cell: Coordinate::new(3, 1),
            expected: 4,
            found: "#".to_string(),
        };
        assert_eq!(
            Locale::En.violation(&v),
            "Wrong path at position (3,1): expected step 4, found #"
        );
        assert_eq!(
            Locale::En.summary(true, 5, 0),
            "Valid path: target reached in 5 steps"
        );
    }

    #[test]
    fn portuguese_messages() {
        let v: Violation = Violation::Overflight {
            cell: Coordinate::new(0, 2),
            altitude: 7,
        };
        assert_eq!(
            Locale::Pt.violation(&v),
            "O drone não pode sobrevoar na posição (0,2): altitude 7 acima do teto"
        );
        let v: Violation = Violation::Isolated {
            cell: Coordinate::new(1, 0),
        };
        assert_eq!(
            Locale::Pt.violation(&v),
            "Movimento da posição (1,0) está isolado!"
        );
        assert_eq!(
            Locale::Pt.summary(false, 0, 2),
            "Caminho inválido: 2 violação(ões)"
        );
    }

    #[test]
    fn every_template_formats() {
        let violations: [Violation; 4] = [
            Violation::MalformedRow {
                line: 1,
                expected: 2,
                found: 3,
            },
            Violation::Overflight {
                cell: Coordinate::new(0, 0),
                altitude: 1,
            },
            Violation::Isolated {
                cell: Coordinate::new(0, 0),
            },
            Violation::WrongPath {
                cell: Coordinate::new(0, 0),
                expected: 1,
                found: "2".to_string(),
            },
        ];
        for locale in [Locale::En, Locale::Pt] {
            for v in &violations {
                let msg: String = locale.violation(v);
                assert!(!msg.contains('{'), "{msg}");
            }
        }
    }
}
