// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LCD status phrases per display language.
//!
//! Phrases are literal strings seen on the front panel / home page of
//! SyncThru firmware. They are matched after normalization (see
//! [`normalize`](super::normalize)), so padding, case and trailing
//! ellipses do not matter here.
//!
//! Within a table the first phrase listed for a state doubles as its display
//! name.

use crate::types::CanonicalState;

/// Phrase table for one display language.
#[derive(Debug)]
pub struct LocaleTable {
    /// Upper-case language tag (`"EN"`, `"DE"`, ...).
    pub language: &'static str,
    /// Phrase to state mapping, display names first.
    pub phrases: &'static [(&'static str, CanonicalState)],
}

impl LocaleTable {
    /// Returns the display name for `state` in this language.
    #[must_use]
    pub fn display_name(&self, state: CanonicalState) -> Option<&'static str> {
        self.phrases
            .iter()
            .find(|(_, s)| *s == state)
            .map(|(phrase, _)| *phrase)
    }
}

use CanonicalState as S;

const EN: LocaleTable = LocaleTable {
    language: "EN",
    phrases: &[
        ("Offline", S::Offline),
        ("Unknown", S::Unknown),
        ("Ready", S::Normal),
        ("Ready to Copy", S::Normal),
        ("Ready to Print", S::Normal),
        ("Ready to Scan", S::Normal),
        ("Ready to Fax", S::Normal),
        ("Sleeping", S::Sleeping),
        ("Power Save", S::Sleeping),
        ("Energy Save Mode", S::Sleeping),
        ("Warming Up", S::WarmingUp),
        ("Warming Up Please Wait", S::WarmingUp),
        ("Printing", S::Printing),
        ("Processing", S::Printing),
        ("Scanning", S::Scanning),
        ("Copying", S::Scanning),
        ("Calibrating", S::Calibrating),
        ("Color Registration", S::Calibrating),
        ("Toner Low", S::Warning),
        ("Prepare New Toner", S::Warning),
        ("Replace Toner Soon", S::Warning),
        ("Paper Low", S::Warning),
        ("Error", S::Error),
        ("Paper Jam", S::Error),
        ("Out of Paper", S::Error),
        ("Door Open", S::Error),
        ("Replace Toner", S::Error),
        ("Toner Empty", S::Error),
        ("Self Test", S::Testing),
        ("Test Print", S::Testing),
    ],
};

const DE: LocaleTable = LocaleTable {
    language: "DE",
    phrases: &[
        ("Offline", S::Offline),
        ("Unbekannt", S::Unknown),
        ("Bereit", S::Normal),
        ("Kopierbereit", S::Normal),
        ("Druckbereit", S::Normal),
        ("Ruhemodus", S::Sleeping),
        ("Energiesparmodus", S::Sleeping),
        ("Aufwärmen", S::WarmingUp),
        ("Aufwaermen", S::WarmingUp),
        ("Druckt", S::Printing),
        ("Drucken", S::Printing),
        ("Scannen", S::Scanning),
        ("Kopieren", S::Scanning),
        ("Kalibrierung", S::Calibrating),
        ("Toner niedrig", S::Warning),
        ("Toner fast leer", S::Warning),
        ("Fehler", S::Error),
        ("Papierstau", S::Error),
        ("Kein Papier", S::Error),
        ("Abdeckung offen", S::Error),
        ("Selbsttest", S::Testing),
    ],
};

const FR: LocaleTable = LocaleTable {
    language: "FR",
    phrases: &[
        ("Hors ligne", S::Offline),
        ("Inconnu", S::Unknown),
        ("Prêt", S::Normal),
        ("Prêt à copier", S::Normal),
        ("Prêt à imprimer", S::Normal),
        ("Veille", S::Sleeping),
        ("Mode veille", S::Sleeping),
        ("Préchauffage", S::WarmingUp),
        ("Impression", S::Printing),
        ("Numérisation", S::Scanning),
        ("Copie", S::Scanning),
        ("Étalonnage", S::Calibrating),
        ("Toner bas", S::Warning),
        ("Erreur", S::Error),
        ("Bourrage papier", S::Error),
        ("Papier épuisé", S::Error),
        ("Capot ouvert", S::Error),
        ("Autotest", S::Testing),
    ],
};

const ES: LocaleTable = LocaleTable {
    language: "ES",
    phrases: &[
        ("Fuera de línea", S::Offline),
        ("Desconocido", S::Unknown),
        ("Listo", S::Normal),
        ("Preparado", S::Normal),
        ("Listo para copiar", S::Normal),
        ("En reposo", S::Sleeping),
        ("Ahorro de energía", S::Sleeping),
        ("Calentando", S::WarmingUp),
        ("Imprimiendo", S::Printing),
        ("Escaneando", S::Scanning),
        ("Copiando", S::Scanning),
        ("Calibrando", S::Calibrating),
        ("Tóner bajo", S::Warning),
        ("Error", S::Error),
        ("Atasco de papel", S::Error),
        ("Sin papel", S::Error),
        ("Autoprueba", S::Testing),
    ],
};

const IT: LocaleTable = LocaleTable {
    language: "IT",
    phrases: &[
        ("Non in linea", S::Offline),
        ("Sconosciuto", S::Unknown),
        ("Pronto", S::Normal),
        ("Pronto per copia", S::Normal),
        ("Risparmio energia", S::Sleeping),
        ("Riscaldamento", S::WarmingUp),
        ("Stampa in corso", S::Printing),
        ("Scansione", S::Scanning),
        ("Copia in corso", S::Scanning),
        ("Calibrazione", S::Calibrating),
        ("Toner scarso", S::Warning),
        ("Errore", S::Error),
        ("Inceppamento carta", S::Error),
        ("Carta esaurita", S::Error),
        ("Autotest", S::Testing),
    ],
};

/// All known locales in registration order.
///
/// The merged, language-independent table is built from this slice front to
/// back; on a phrase collision the earlier locale keeps its entry.
pub static LOCALES: &[LocaleTable] = &[EN, DE, FR, ES, IT];
