//! Enumerated ACH codes and their mapping tables.
//!
//! Codes keep their raw value so that a file containing an unknown code can
//! still be decoded, re-encoded byte for byte, and rejected by validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of money movement for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flavor {
    Credit,
    Debit,
}

/// Whether an entry originates a payment or returns a prior one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Forward,
    Return,
}

/// Two-digit Entry Detail transaction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionCode(pub u8);

impl TransactionCode {
    pub const CHECKING_RETURN_CREDIT: Self = TransactionCode(21);
    pub const CHECKING_CREDIT: Self = TransactionCode(22);
    pub const CHECKING_PRENOTE_CREDIT: Self = TransactionCode(23);
    pub const CHECKING_ZERO_DOLLAR_CREDIT: Self = TransactionCode(24);
    pub const CHECKING_RETURN_DEBIT: Self = TransactionCode(26);
    pub const CHECKING_DEBIT: Self = TransactionCode(27);
    pub const CHECKING_PRENOTE_DEBIT: Self = TransactionCode(28);
    pub const CHECKING_ZERO_DOLLAR_DEBIT: Self = TransactionCode(29);
    pub const SAVINGS_RETURN_CREDIT: Self = TransactionCode(31);
    pub const SAVINGS_CREDIT: Self = TransactionCode(32);
    pub const SAVINGS_PRENOTE_CREDIT: Self = TransactionCode(33);
    pub const SAVINGS_ZERO_DOLLAR_CREDIT: Self = TransactionCode(34);
    pub const SAVINGS_RETURN_DEBIT: Self = TransactionCode(36);
    pub const SAVINGS_DEBIT: Self = TransactionCode(37);
    pub const SAVINGS_PRENOTE_DEBIT: Self = TransactionCode(38);
    pub const SAVINGS_ZERO_DOLLAR_DEBIT: Self = TransactionCode(39);
    pub const GL_RETURN_CREDIT: Self = TransactionCode(41);
    pub const GL_CREDIT: Self = TransactionCode(42);
    pub const GL_PRENOTE_CREDIT: Self = TransactionCode(43);
    pub const GL_ZERO_DOLLAR_CREDIT: Self = TransactionCode(44);
    pub const GL_RETURN_DEBIT: Self = TransactionCode(46);
    pub const GL_DEBIT: Self = TransactionCode(47);
    pub const GL_PRENOTE_DEBIT: Self = TransactionCode(48);
    pub const GL_ZERO_DOLLAR_DEBIT: Self = TransactionCode(49);
    pub const LOAN_RETURN_CREDIT: Self = TransactionCode(51);
    pub const LOAN_CREDIT: Self = TransactionCode(52);
    pub const LOAN_PRENOTE_CREDIT: Self = TransactionCode(53);
    pub const LOAN_ZERO_DOLLAR_CREDIT: Self = TransactionCode(54);
    pub const LOAN_DEBIT: Self = TransactionCode(55);
    pub const LOAN_RETURN_DEBIT: Self = TransactionCode(56);

    /// Credit or debit, or `None` for codes outside the NACHA table.
    pub fn flavor(self) -> Option<Flavor> {
        match self.0 {
            21..=24 | 31..=34 | 41..=44 | 51..=54 => Some(Flavor::Credit),
            26..=29 | 36..=39 | 46..=49 | 55 | 56 => Some(Flavor::Debit),
            _ => None,
        }
    }

    pub fn is_credit(self) -> bool {
        self.flavor() == Some(Flavor::Credit)
    }

    pub fn is_debit(self) -> bool {
        self.flavor() == Some(Flavor::Debit)
    }

    /// Prenotification codes carry no money.
    pub fn is_prenote(self) -> bool {
        matches!(self.0, 23 | 28 | 33 | 38 | 43 | 48 | 53)
    }

    /// Zero-dollar remittance codes carry no money either.
    pub fn is_zero_dollar(self) -> bool {
        matches!(self.0, 24 | 29 | 34 | 39 | 44 | 49 | 54)
    }
}

impl fmt::Display for TransactionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Three-digit batch service class code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceClassCode(pub u16);

impl ServiceClassCode {
    pub const MIXED_DEBITS_AND_CREDITS: Self = ServiceClassCode(200);
    pub const CREDITS_ONLY: Self = ServiceClassCode(220);
    pub const DEBITS_ONLY: Self = ServiceClassCode(225);
    pub const AUTOMATED_ACCOUNTING_ADVICES: Self = ServiceClassCode(280);

    pub fn is_known(self) -> bool {
        matches!(self.0, 200 | 220 | 225 | 280)
    }

    /// Whether entries of `flavor` may appear under this service class.
    pub fn permits(self, flavor: Flavor) -> bool {
        match self {
            Self::CREDITS_ONLY => flavor == Flavor::Credit,
            Self::DEBITS_ONLY => flavor == Flavor::Debit,
            _ => true,
        }
    }
}

impl fmt::Display for ServiceClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Standard Entry Class code of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SecCode {
    Ack,
    Adv,
    Arc,
    Atx,
    Boc,
    Ccd,
    Cie,
    Cor,
    Ctx,
    Dne,
    Enr,
    Iat,
    Mte,
    Pop,
    Pos,
    #[default]
    Ppd,
    Rck,
    Shr,
    Tel,
    Trc,
    Trx,
    Web,
    Xck,
    /// Code outside the NACHA list, kept verbatim
    Unknown(String),
}

const SEC_CODES: &[(&str, SecCode)] = &[
    ("ACK", SecCode::Ack),
    ("ADV", SecCode::Adv),
    ("ARC", SecCode::Arc),
    ("ATX", SecCode::Atx),
    ("BOC", SecCode::Boc),
    ("CCD", SecCode::Ccd),
    ("CIE", SecCode::Cie),
    ("COR", SecCode::Cor),
    ("CTX", SecCode::Ctx),
    ("DNE", SecCode::Dne),
    ("ENR", SecCode::Enr),
    ("IAT", SecCode::Iat),
    ("MTE", SecCode::Mte),
    ("POP", SecCode::Pop),
    ("POS", SecCode::Pos),
    ("PPD", SecCode::Ppd),
    ("RCK", SecCode::Rck),
    ("SHR", SecCode::Shr),
    ("TEL", SecCode::Tel),
    ("TRC", SecCode::Trc),
    ("TRX", SecCode::Trx),
    ("WEB", SecCode::Web),
    ("XCK", SecCode::Xck),
];

impl SecCode {
    pub fn as_str(&self) -> &str {
        match self {
            SecCode::Unknown(raw) => raw,
            known => SEC_CODES
                .iter()
                .find(|(_, code)| code == known)
                .map(|(s, _)| *s)
                .unwrap_or_default(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SecCode::Unknown(_))
    }

    /// Whether entries of `flavor` may be originated under this SEC code.
    pub fn permits(&self, flavor: Flavor) -> bool {
        match self {
            SecCode::Arc
            | SecCode::Boc
            | SecCode::Pop
            | SecCode::Rck
            | SecCode::Tel
            | SecCode::Xck => flavor == Flavor::Debit,
            SecCode::Cie => flavor == Flavor::Credit,
            _ => true,
        }
    }

    /// Terminal (type 02) addenda belong to card-present SEC codes only.
    pub fn uses_terminal_addenda(&self) -> bool {
        matches!(self, SecCode::Mte | SecCode::Pos | SecCode::Shr)
    }

    /// Upper bound on type 05 addenda per entry.
    pub fn max_payment_addenda(&self) -> usize {
        match self {
            SecCode::Ctx | SecCode::Enr => 9999,
            code if code.uses_terminal_addenda() => 0,
            _ => 1,
        }
    }
}

impl From<&str> for SecCode {
    fn from(raw: &str) -> Self {
        SEC_CODES
            .iter()
            .find(|(s, _)| *s == raw)
            .map(|(_, code)| code.clone())
            .unwrap_or_else(|| SecCode::Unknown(raw.to_string()))
    }
}

impl From<String> for SecCode {
    fn from(raw: String) -> Self {
        SecCode::from(raw.as_str())
    }
}

impl From<SecCode> for String {
    fn from(code: SecCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for SecCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
