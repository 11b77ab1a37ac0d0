//! Payment recording
//!
//! Validates a payment against the student's resolved amount and appends a
//! new fee record. Prior records are never touched; a second instalment is
//! simply another record.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use core_kernel::{AcademicPeriod, Money, SchoolId};

use crate::catalog::FeeType;
use crate::error::FeeError;
use crate::ports::FeeRecordStore;
use crate::record::{FeeRecord, NewFeeRecord, PaymentStatus};
use crate::resolver::FeeResolver;
use crate::school::{CollectorRef, Student};

/// A payment the caller wants recorded
///
/// The amount is fixed by the caller; the recorder never derives "pay the
/// remaining balance" itself.
#[derive(Debug, Clone)]
pub struct PaymentRequest<'a> {
    pub school_id: SchoolId,
    pub student: &'a Student,
    pub fee_type: &'a FeeType,
    pub collector: CollectorRef,
    pub period: AcademicPeriod,
    pub amount: Money,
}

/// Validates a payment and builds the record to persist
///
/// Fails with `NotApplicable` when the fee resolves to zero for the
/// student's class, and with `InvalidAmount` when the amount is not in
/// `(0, full_amount]`. The status reflects this record alone.
pub fn prepare_payment(request: PaymentRequest<'_>) -> Result<NewFeeRecord, FeeError> {
    let full_amount = FeeResolver::resolve_amount(request.student, request.fee_type);
    if !full_amount.is_positive() {
        return Err(FeeError::NotApplicable {
            fee_type: request.fee_type.name.clone(),
            class_id: request.student.class_id,
        });
    }

    if !request.amount.is_positive() || request.amount > full_amount {
        return Err(FeeError::InvalidAmount {
            requested: request.amount,
            full_amount,
        });
    }

    let status = if request.amount >= full_amount {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    };

    Ok(NewFeeRecord {
        school_id: request.school_id,
        student_id: request.student.id,
        fee_type_id: request.fee_type.id,
        amount: full_amount,
        paid: request.amount,
        due_date: request.fee_type.due_date,
        status,
        period: request.period,
        collector: request.collector,
    })
}

/// Records payments through a [`FeeRecordStore`]
#[derive(Clone)]
pub struct PaymentRecorder {
    store: Arc<dyn FeeRecordStore>,
}

impl PaymentRecorder {
    pub fn new(store: Arc<dyn FeeRecordStore>) -> Self {
        Self { store }
    }

    /// Validates and persists one payment event
    ///
    /// Store failures come back as `StoreUnavailable` and are not retried.
    #[instrument(
        skip(self, request),
        fields(
            student = %request.student.id,
            fee_type = %request.fee_type.id,
            period = %request.period,
            amount = %request.amount,
        )
    )]
    pub async fn record_payment(&self, request: PaymentRequest<'_>) -> Result<FeeRecord, FeeError> {
        let new_record = prepare_payment(request).map_err(|e| {
            warn!(error = %e, "Payment rejected");
            e
        })?;

        let record = self.store.insert(new_record).await?;

        info!(
            record_id = %record.id,
            status = %record.status,
            "Payment recorded"
        );
        Ok(record)
    }
}
