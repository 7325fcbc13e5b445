//! Product form prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cache::{InMemorySelectedProduct, SelectedProductCache},
    calendar::{DateValue, add_years, format_date_for_input, parse_date},
    config::{ConfigError, FormConfig, LengthLimits},
    form::{
        ErrorKind, Field, FieldErrors, FormControl, ProductForm, ValidationError,
        messages::error_message,
    },
    lifecycle::{FormContext, LOAD_ERROR_MESSAGE, Mode, ProductFormController},
    navigation::Navigator,
    products::{Product, ProductId},
    scope::CancellationScope,
    store::{ProductStore, ProductStoreError},
    submission::{
        FORM_INVALID_MESSAGE, SAVE_ERROR_MESSAGE, SubmissionResult, SubmissionState, Submitter,
    },
};
