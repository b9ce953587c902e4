use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ClaveError;

/// Transmission context of a document, encoded as the situation digit of the clave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Situation {
    /// Issued and sent while the reception API is reachable.
    Normal,
    /// Issued under the authority's contingency procedure.
    Contingency,
    /// Issued while the reception API could not be reached.
    NoConnectivity,
}

impl Situation {
    /// The single digit stored in the clave.
    pub fn code(self) -> char {
        match self {
            Self::Normal => '1',
            Self::Contingency => '2',
            Self::NoConnectivity => '3',
        }
    }

    pub fn from_code(code: char) -> Result<Self, ClaveError> {
        match code {
            '1' => Ok(Self::Normal),
            '2' => Ok(Self::Contingency),
            '3' => Ok(Self::NoConnectivity),
            other => Err(ClaveError::Situation(other)),
        }
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Contingency => "contingency",
            Self::NoConnectivity => "no connectivity",
        };
        f.write_str(name)
    }
}

/// Where a document stands in its exchange with the reception API.
///
/// Status only moves forward: `Pending` → `Sent` → `Confirmed` → one of the
/// three final verdicts. Verdicts can also arrive directly after `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransmissionStatus {
    Pending,
    Sent,
    Confirmed,
    AcceptedFull,
    AcceptedPartial,
    Rejected,
}

impl TransmissionStatus {
    /// Stable numeric code used by storage backends.
    pub fn code(self) -> u8 {
        match self {
            Self::Pending => 1,
            Self::Sent => 2,
            Self::Confirmed => 3,
            Self::AcceptedFull => 4,
            Self::AcceptedPartial => 5,
            Self::Rejected => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Pending),
            2 => Some(Self::Sent),
            3 => Some(Self::Confirmed),
            4 => Some(Self::AcceptedFull),
            5 => Some(Self::AcceptedPartial),
            6 => Some(Self::Rejected),
            _ => None,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Sent => 1,
            Self::Confirmed => 2,
            Self::AcceptedFull | Self::AcceptedPartial | Self::Rejected => 3,
        }
    }

    /// True for the authority's final verdicts.
    pub fn is_final(self) -> bool {
        self.rank() == 3
    }

    /// Whether `next` is a forward move from `self`.
    pub fn can_advance_to(self, next: Self) -> bool {
        next.rank() > self.rank()
    }

    /// Return `next` if it is a forward move, otherwise a transition error.
    pub fn advance(self, next: Self) -> Result<Self, ClaveError> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(ClaveError::StatusTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for TransmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Confirmed => "confirmed",
            Self::AcceptedFull => "accepted",
            Self::AcceptedPartial => "partially accepted",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Document type code carried at positions 8..10 of a consecutivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// 01: Factura electrónica.
    FacturaElectronica,
    /// 02: Nota de débito electrónica.
    NotaDebito,
    /// 03: Nota de crédito electrónica.
    NotaCredito,
    /// 04: Tiquete electrónico.
    TiqueteElectronico,
    /// 05: Confirmación de aceptación del comprobante.
    ConfirmacionAceptacion,
    /// 06: Confirmación de aceptación parcial.
    ConfirmacionAceptacionParcial,
    /// 07: Confirmación de rechazo.
    ConfirmacionRechazo,
    /// 08: Factura electrónica de compra.
    FacturaCompra,
    /// 09: Factura electrónica de exportación.
    FacturaExportacion,
}

impl DocumentKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::FacturaElectronica => "01",
            Self::NotaDebito => "02",
            Self::NotaCredito => "03",
            Self::TiqueteElectronico => "04",
            Self::ConfirmacionAceptacion => "05",
            Self::ConfirmacionAceptacionParcial => "06",
            Self::ConfirmacionRechazo => "07",
            Self::FacturaCompra => "08",
            Self::FacturaExportacion => "09",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::FacturaElectronica),
            "02" => Some(Self::NotaDebito),
            "03" => Some(Self::NotaCredito),
            "04" => Some(Self::TiqueteElectronico),
            "05" => Some(Self::ConfirmacionAceptacion),
            "06" => Some(Self::ConfirmacionAceptacionParcial),
            "07" => Some(Self::ConfirmacionRechazo),
            "08" => Some(Self::FacturaCompra),
            "09" => Some(Self::FacturaExportacion),
            _ => None,
        }
    }
}

/// Identification scheme of an issuer or receiver (`tipoIdentificacion`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentificationType {
    /// 01: Cédula física.
    #[serde(rename = "01")]
    Fisica,
    /// 02: Cédula jurídica.
    #[serde(rename = "02")]
    Juridica,
    /// 03: DIMEX (foreign resident).
    #[serde(rename = "03")]
    Dimex,
    /// 04: NITE.
    #[serde(rename = "04")]
    Nite,
}

impl IdentificationType {
    pub fn code(self) -> &'static str {
        match self {
            Self::Fisica => "01",
            Self::Juridica => "02",
            Self::Dimex => "03",
            Self::Nite => "04",
        }
    }
}

/// A typed identification number, as sent in `emisor` / `receptor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    pub kind: IdentificationType,
    /// Identification number as registered, without padding.
    pub number: String,
}

impl Identification {
    pub fn new(kind: IdentificationType, number: impl Into<String>) -> Self {
        Self {
            kind,
            number: number.into(),
        }
    }
}
