use error_stack::Report;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidationErrors> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        self.map_err(|errors| {
            let mut queue = Vec::new();
            read_errors(&errors, &mut queue, Report::new(Wrapper))
        })
    }
}

fn read_errors(
    errors: &ValidationErrors,
    fields_queue: &mut Vec<String>,
    mut report: Report<Wrapper>,
) -> Report<Wrapper> {
    for (field, kind) in errors.errors() {
        fields_queue.push(format!("{field}"));
        match kind {
            ValidationErrorsKind::Struct(inner) => {
                report = read_errors(inner, fields_queue, report);
            }
            ValidationErrorsKind::List(list) => {
                for (index, inner) in list {
                    fields_queue.push(index.to_string());
                    report = read_errors(inner, fields_queue, report);
                    fields_queue.pop();
                }
            }
            ValidationErrorsKind::Field(messages) => {
                let field_str = fields_queue.join(".");
                for message in messages {
                    let message = message.message.as_deref().unwrap_or(&message.code);
                    report = report.attach_printable(format!("{field_str}: {message}"));
                }
            }
        }
        fields_queue.pop();
    }
    report
}
