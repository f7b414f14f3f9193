use extract::{CaseFields, is_informed};

/// Literal tokens the composed letter carries for the case identifiers.
pub const PLACEHOLDER_NIP: &str = "[número da NIP]";
pub const PLACEHOLDER_PROTOCOL: &str = "[protocolo]";
pub const PLACEHOLDER_DEMAND: &str = "[número da demanda]";

/// Substituted when no document supplies all three identifiers. The
/// letter is still produced so the value can be corrected by hand.
pub const MISSING_VALUE: &str = "DADO NÃO ENCONTRADO";

pub const LABEL_NIP: &str = "Número da NIP";
pub const LABEL_PROTOCOL: &str = "Protocolo";
pub const LABEL_DEMAND: &str = "Número da demanda";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseIdentifiers {
    pub nip: String,
    pub protocolo: String,
    pub demanda: String,
}

impl Default for CaseIdentifiers {
    fn default() -> Self {
        Self {
            nip: MISSING_VALUE.to_string(),
            protocolo: MISSING_VALUE.to_string(),
            demanda: MISSING_VALUE.to_string(),
        }
    }
}

impl CaseIdentifiers {
    pub fn is_complete(&self) -> bool {
        self.nip != MISSING_VALUE && self.protocolo != MISSING_VALUE && self.demanda != MISSING_VALUE
    }
}

/// First batch entry carrying all three identifier labels with informed
/// values wins; entries with placeholder-style values are passed over
/// and scanning continues.
pub fn find_identifiers(batch: &[CaseFields]) -> CaseIdentifiers {
    for fields in batch {
        if !(fields.has_label(LABEL_NIP)
            && fields.has_label(LABEL_PROTOCOL)
            && fields.has_label(LABEL_DEMAND))
        {
            continue;
        }

        let nip = fields.value_of(LABEL_NIP);
        let protocolo = fields.value_of(LABEL_PROTOCOL);
        let demanda = fields.value_of(LABEL_DEMAND);

        if let (Some(nip), Some(protocolo), Some(demanda)) = (nip, protocolo, demanda) {
            if is_informed(&nip) && is_informed(&protocolo) && is_informed(&demanda) {
                return CaseIdentifiers {
                    nip,
                    protocolo,
                    demanda,
                };
            }
        }
    }

    CaseIdentifiers::default()
}

/// Purely textual substitution of the three placeholder tokens; no
/// model call, everything else in the draft stays untouched.
pub fn fill_letter(draft: &str, ids: &CaseIdentifiers) -> String {
    draft
        .replace(PLACEHOLDER_NIP, &ids.nip)
        .replace(PLACEHOLDER_PROTOCOL, &ids.protocolo)
        .replace(PLACEHOLDER_DEMAND, &ids.demanda)
}
