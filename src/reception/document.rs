use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{
    CR_COUNTRY_CODE, Clave, ClaveError, Consecutivo, Identification, Situation,
    TransmissionStatus, costa_rica_date, generate_clave,
};

/// The fields of an electronic document this crate reads, plus the caller's body.
///
/// `P` is the invoice content (lines, taxes, totals); it is only handed to the
/// [`XmlBuilder`](super::XmlBuilder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentData<P> {
    pub consecutivo: Consecutivo,
    /// Emission timestamp, sent as `fecha`.
    pub issued_at: DateTime<FixedOffset>,
    pub issuer: Identification,
    /// Absent for documents without an identified receiver, e.g. tiquetes.
    pub receiver: Option<Identification>,
    pub body: P,
}

/// An electronic document (comprobante) and its transmission state.
///
/// Created through [`Submitter::create_document`](super::Submitter::create_document)
/// with situation `Normal` and status `Pending`. The clave belongs to the
/// document and is replaced only when the document goes offline.
#[derive(Debug, Clone)]
pub struct Document<P> {
    clave: Clave,
    situation: Situation,
    status: TransmissionStatus,
    data: DocumentData<P>,
}

impl<P> Document<P> {
    pub(crate) fn new(data: DocumentData<P>) -> Result<Self, ClaveError> {
        let situation = Situation::Normal;
        let clave = clave_for(&data, situation)?;
        Ok(Self {
            clave,
            situation,
            status: TransmissionStatus::Pending,
            data,
        })
    }

    pub fn clave(&self) -> &Clave {
        &self.clave
    }

    pub fn situation(&self) -> Situation {
        self.situation
    }

    pub fn status(&self) -> TransmissionStatus {
        self.status
    }

    pub fn data(&self) -> &DocumentData<P> {
        &self.data
    }

    pub fn issuer_number(&self) -> &str {
        &self.data.issuer.number
    }

    pub fn consecutivo(&self) -> &Consecutivo {
        &self.data.consecutivo
    }

    /// Move the transmission status forward, e.g. when Hacienda's verdict arrives.
    pub fn advance(&mut self, next: TransmissionStatus) -> Result<(), ClaveError> {
        self.status = self.status.advance(next)?;
        Ok(())
    }

    /// Switch to `NoConnectivity` and regenerate the clave.
    ///
    /// Allowed once per document; returns the new clave.
    pub fn go_offline(&mut self) -> Result<&Clave, ClaveError> {
        match self.situation {
            Situation::Normal | Situation::Contingency => {}
            Situation::NoConnectivity => {
                return Err(ClaveError::SituationLocked(self.situation.to_string()));
            }
        }
        let clave = clave_for(&self.data, Situation::NoConnectivity)?;
        self.situation = Situation::NoConnectivity;
        self.clave = clave;
        Ok(&self.clave)
    }
}

fn clave_for<P>(data: &DocumentData<P>, situation: Situation) -> Result<Clave, ClaveError> {
    let issue_date = costa_rica_date(data.issued_at.with_timezone(&Utc));
    generate_clave(
        CR_COUNTRY_CODE,
        issue_date,
        &data.issuer.number,
        &data.consecutivo,
        situation,
    )
}
