//! Load loans from flat CSV files (batch runs) or JSON documents (full configuration)

use super::{ArmConfig, ExtraPayments, LoanInputs, LoanType, PmiConfig};
use crate::error::{MortgageError, MortgageResult};
use csv::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Raw CSV row; one loan per line, blank cells for absent values
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "InterestRate")]
    interest_rate: f64,
    #[serde(rename = "TermYears")]
    term_years: u32,
    #[serde(rename = "PropertyTax", default)]
    property_tax: Option<f64>,
    #[serde(rename = "Insurance", default)]
    insurance: Option<f64>,
    #[serde(rename = "HOA", default)]
    hoa_fees: Option<f64>,
    #[serde(rename = "PropertyPrice", default)]
    property_price: Option<f64>,
    #[serde(rename = "DownPaymentPct", default)]
    down_payment_percent: Option<f64>,
    #[serde(rename = "DiscountPoints", default)]
    discount_points: Option<f64>,
    #[serde(rename = "OriginationPoints", default)]
    origination_points: Option<f64>,
    #[serde(rename = "PMIType", default)]
    pmi_type: Option<String>,
    #[serde(rename = "PMIRate", default)]
    pmi_rate: Option<f64>,
    #[serde(rename = "ExtraMonthly", default)]
    extra_monthly: Option<f64>,
    #[serde(rename = "LoanType", default)]
    loan_type: Option<String>,
    #[serde(rename = "ARMFixedYears", default)]
    arm_fixed_years: Option<u32>,
    #[serde(rename = "ARMInitialCap", default)]
    arm_initial_cap: Option<f64>,
    #[serde(rename = "ARMPeriodicCap", default)]
    arm_periodic_cap: Option<f64>,
    #[serde(rename = "ARMLifetimeCap", default)]
    arm_lifetime_cap: Option<f64>,
}

impl CsvRow {
    fn into_loan(self) -> MortgageResult<LoanInputs> {
        let loan_type = match self.loan_type.as_deref().map(str::trim) {
            None | Some("") | Some("fixed") => LoanType::Fixed,
            Some("arm") => LoanType::Arm,
            Some(other) => return Err(unknown("LoanType", other)),
        };

        let pmi_config = match self.pmi_type.as_deref().map(str::trim) {
            None | Some("") | Some("none") => PmiConfig::NotRequired,
            Some("monthly") => PmiConfig::Monthly {
                annual_rate: self.pmi_rate.ok_or_else(|| {
                    MortgageError::invalid("PMIRate", "required when PMIType is monthly")
                })?,
            },
            Some("lender_paid") => PmiConfig::LenderPaid,
            Some(other) => return Err(unknown("PMIType", other)),
        };

        // ARM columns are only read for ARM rows; a missing fixed period leaves the
        // config absent so the engine rejects the row
        let arm_config = match (loan_type, self.arm_fixed_years) {
            (LoanType::Arm, Some(years)) => Some(ArmConfig::new(
                years,
                self.arm_initial_cap.unwrap_or(0.0),
                self.arm_periodic_cap.unwrap_or(0.0),
                self.arm_lifetime_cap.unwrap_or(0.0),
            )),
            _ => None,
        };

        Ok(LoanInputs {
            property_tax: self.property_tax,
            insurance: self.insurance,
            hoa_fees: self.hoa_fees,
            property_price: self.property_price,
            down_payment_percent: self.down_payment_percent,
            discount_points: self.discount_points,
            origination_points: self.origination_points,
            pmi_config,
            extra_payments: ExtraPayments {
                extra_monthly: self.extra_monthly,
                ..Default::default()
            },
            loan_type,
            arm_config,
            ..LoanInputs::new(self.principal, self.interest_rate, self.term_years)
        })
    }
}

fn unknown(kind: &str, value: &str) -> MortgageError {
    MortgageError::UnknownVariant {
        kind: kind.to_string(),
        value: value.to_string(),
    }
}

/// Load all loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> MortgageResult<Vec<LoanInputs>> {
    let file = File::open(path)?;
    load_loans_from_reader(file)
}

/// Load loans from any reader (e.g., string buffer, stdin)
pub fn load_loans_from_reader<R: std::io::Read>(reader: R) -> MortgageResult<Vec<LoanInputs>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut loans = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        loans.push(row.into_loan()?);
    }

    Ok(loans)
}

/// Load a single fully-specified loan from a JSON file
pub fn load_loan_json<P: AsRef<Path>>(path: P) -> MortgageResult<LoanInputs> {
    let file = File::open(path)?;
    load_loan_json_from_reader(BufReader::new(file))
}

pub fn load_loan_json_from_reader<R: std::io::Read>(reader: R) -> MortgageResult<LoanInputs> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOANS_CSV: &str = "\
Principal,InterestRate,TermYears,PropertyTax,Insurance,HOA,PropertyPrice,DownPaymentPct,DiscountPoints,OriginationPoints,PMIType,PMIRate,ExtraMonthly,LoanType,ARMFixedYears,ARMInitialCap,ARMPeriodicCap,ARMLifetimeCap
200000,5,30,,,,,,,,,,,,,,,
450000,6.5,30,6000,1500,100,500000,10,1,0.5,monthly,0.005,200,fixed,,,,
400000,5,30,,,,,,,,none,,,arm,5,2,2,5
";

    #[test]
    fn test_load_loans_from_reader() {
        let loans = load_loans_from_reader(LOANS_CSV.as_bytes()).expect("Failed to load loans");
        assert_eq!(loans.len(), 3);

        let plain = &loans[0];
        assert_eq!(plain.principal, 200_000.0);
        assert_eq!(plain.loan_type, LoanType::Fixed);
        assert_eq!(plain.pmi_config, PmiConfig::NotRequired);
        assert!(plain.property_tax.is_none());

        let featured = &loans[1];
        assert_eq!(featured.property_price, Some(500_000.0));
        assert_eq!(featured.pmi_config, PmiConfig::Monthly { annual_rate: 0.005 });
        assert_eq!(featured.extra_payments.extra_monthly, Some(200.0));
        assert_eq!(featured.hoa_fees, Some(100.0));

        let arm = &loans[2];
        assert!(arm.is_arm());
        assert_eq!(arm.arm_config, Some(ArmConfig::new(5, 2.0, 2.0, 5.0)));
    }

    #[test]
    fn test_unknown_loan_type_rejected() {
        let csv = "Principal,InterestRate,TermYears,LoanType\n200000,5,30,balloon\n";
        let err = load_loans_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, MortgageError::UnknownVariant { .. }));
    }

    #[test]
    fn test_monthly_pmi_requires_rate() {
        let csv = "Principal,InterestRate,TermYears,PMIType\n200000,5,30,monthly\n";
        let err = load_loans_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { .. }));
    }

    #[test]
    fn test_load_loan_json() {
        let json = r#"{
            "principal": 320000,
            "interest_rate": 6.25,
            "term_years": 30,
            "property_price": 400000,
            "pmi_config": {"type": "single_premium", "amount": 4200},
            "extra_payments": {"lump_sums": [{"amount": 10000, "payment_month": 60}]},
            "closing_costs": {"appraisal_fee": 650}
        }"#;

        let loan = load_loan_json_from_reader(json.as_bytes()).expect("valid loan JSON");
        assert_eq!(loan.pmi_config, PmiConfig::SinglePremium { amount: 4_200.0 });
        assert_eq!(loan.extra_payments.lump_sums.len(), 1);
        assert_eq!(loan.closing_costs.appraisal_fee, Some(650.0));
    }
}
