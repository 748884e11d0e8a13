use serde::{Deserialize, Serialize};

use supplyhub_core::{AddressId, Entity, Notifier, SupplierId};

use crate::document::{self, CNPJ_LENGTH, CPF_LENGTH};
use crate::product::Product;
use crate::rules;

/// Supplier kind: decides which document the supplier must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierKind {
    /// Natural person, identified by a CPF.
    Individual,
    /// Legal entity, identified by a CNPJ.
    Company,
}

impl SupplierKind {
    /// Numeric code used on the wire: 1 = individual, 2 = company.
    pub fn code(self) -> u8 {
        match self {
            SupplierKind::Individual => 1,
            SupplierKind::Company => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(SupplierKind::Individual),
            2 => Some(SupplierKind::Company),
            _ => None,
        }
    }
}

/// Supplier entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub document: String,
    pub kind: SupplierKind,
    pub active: bool,
    pub address: Option<Address>,
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> SupplierId {
        self.id
    }
}

impl Supplier {
    /// Check the supplier's own fields (not its address).
    ///
    /// Every broken rule is recorded; returns whether all rules held.
    pub fn validate(&self, notifier: &mut Notifier) -> bool {
        let mut ok = rules::length_between(notifier, "Name", &self.name, 2, 100);

        let (len, valid): (usize, fn(&str) -> bool) = match self.kind {
            SupplierKind::Individual => (CPF_LENGTH, document::is_valid_cpf),
            SupplierKind::Company => (CNPJ_LENGTH, document::is_valid_cnpj),
        };
        if rules::exact_digits(notifier, "Document", &self.document, len) {
            if !valid(&self.document) {
                notifier.notify("The provided document is invalid.");
                ok = false;
            }
        } else {
            ok = false;
        }

        ok
    }
}

/// Postal address of a supplier (at most one per supplier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub supplier_id: SupplierId,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub zip_code: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl Entity for Address {
    type Id = AddressId;

    fn id(&self) -> AddressId {
        self.id
    }
}

impl Address {
    pub fn validate(&self, notifier: &mut Notifier) -> bool {
        // Evaluate every rule so the caller sees all violations at once.
        let results = [
            rules::length_between(notifier, "Street", &self.street, 2, 200),
            rules::length_between(notifier, "Number", &self.number, 1, 50),
            rules::exact_digits(notifier, "ZipCode", &self.zip_code, 8),
            rules::length_between(notifier, "Neighborhood", &self.neighborhood, 2, 100),
            rules::length_between(notifier, "City", &self.city, 2, 100),
            rules::length_between(notifier, "State", &self.state, 2, 50),
        ];
        results.iter().all(|ok| *ok)
    }
}

/// Read model: a supplier joined with its address and products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierDetails {
    pub supplier: Supplier,
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier(kind: SupplierKind, document: &str) -> Supplier {
        Supplier {
            id: SupplierId::new(),
            name: "Acme Ltda".into(),
            document: document.into(),
            kind,
            active: true,
            address: None,
        }
    }

    fn address() -> Address {
        Address {
            id: AddressId::new(),
            supplier_id: SupplierId::new(),
            street: "Rua das Flores".into(),
            number: "100".into(),
            complement: None,
            zip_code: "01001000".into(),
            neighborhood: "Centro".into(),
            city: "Sao Paulo".into(),
            state: "SP".into(),
        }
    }

    #[test]
    fn company_with_valid_cnpj_passes() {
        let mut notifier = Notifier::new();
        assert!(supplier(SupplierKind::Company, "11222333000181").validate(&mut notifier));
        assert!(!notifier.has_notifications());
    }

    #[test]
    fn individual_requires_cpf_length() {
        let mut notifier = Notifier::new();
        assert!(!supplier(SupplierKind::Individual, "11222333000181").validate(&mut notifier));
        assert_eq!(
            notifier.notifications()[0].message(),
            "The field Document must have 11 characters and 14 were provided."
        );
    }

    #[test]
    fn bad_check_digit_is_reported() {
        let mut notifier = Notifier::new();
        assert!(!supplier(SupplierKind::Individual, "52998224724").validate(&mut notifier));
        assert_eq!(notifier.notifications()[0].message(), "The provided document is invalid.");
    }

    #[test]
    fn name_and_document_violations_are_both_reported() {
        let mut s = supplier(SupplierKind::Individual, "123");
        s.name = String::new();
        let mut notifier = Notifier::new();
        assert!(!s.validate(&mut notifier));
        assert_eq!(notifier.notifications().len(), 2);
    }

    #[test]
    fn kind_codes_round_trip() {
        for kind in [SupplierKind::Individual, SupplierKind::Company] {
            assert_eq!(SupplierKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(SupplierKind::from_code(3), None);
    }

    #[test]
    fn valid_address_passes() {
        let mut notifier = Notifier::new();
        assert!(address().validate(&mut notifier));
        assert!(!notifier.has_notifications());
    }

    #[test]
    fn address_reports_every_broken_rule() {
        let mut a = address();
        a.street = "R".into();
        a.zip_code = "0100-100".into();
        a.city = String::new();
        let mut notifier = Notifier::new();
        assert!(!a.validate(&mut notifier));
        assert_eq!(notifier.notifications().len(), 3);
    }
}
