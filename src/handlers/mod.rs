//! Built-in steganalysis job functions and their service advertisement.
//!
//! The engine treats handlers as opaque `(job) -> result` functions; this
//! module carries the two production functions (`auto` and
//! `effnetb0_predict`) with the actual analysis algorithms injected through
//! the [`AutoAnalyzer`] and [`ModelInference`] seams.

pub mod auto;
pub mod ml;

pub use auto::{AutoAnalyzer, AutoHandler, AutoPredictions};
pub use ml::{EffnetB0Handler, ModelInference};

use std::sync::Arc;

use crate::registry::{HandlerTable, ModelRegistry};
use crate::service::{FieldType, FunctionDescriptor, ServiceDescriptor};

/// Handler table with the built-in functions registered.
pub fn builtin_handlers(
    registry: Arc<ModelRegistry>,
    analyzer: Arc<dyn AutoAnalyzer>,
    inference: Arc<dyn ModelInference>,
) -> HandlerTable {
    let mut table = HandlerTable::new();
    table.register("auto", AutoHandler::new(analyzer));
    table.register("effnetb0_predict", EffnetB0Handler::new(registry, inference));
    table
}

/// The service advertisement for the built-in functions.
pub fn builtin_descriptor() -> ServiceDescriptor {
    ServiceDescriptor::new(
        "aletheia",
        "Aletheia automated tools as a DFIR Steg-Hub Service",
    )
    .with_function(
        FunctionDescriptor::new("auto", "Tries different steganalysis methods.")
            .with_return_field(
                "outguess_pred",
                "Prediction Outguess (JPG)",
                FieldType::Float,
                "Probability Outguess",
            )
            .with_return_field(
                "steghide_pred",
                "Prediction Steghide (JPG)",
                FieldType::Float,
                "Probability Steghide",
            )
            .with_return_field(
                "nsf5_pred",
                "Prediction nsF5 (JPG)",
                FieldType::Float,
                "Probability nsF5",
            )
            .with_return_field(
                "juniward_pred",
                "Prediction J-Uniward (JPG)",
                FieldType::Float,
                "Probability J-Uniward",
            )
            .with_return_field(
                "lsbr_pred",
                "Prediction LSBR (PNG)",
                FieldType::Float,
                "Estimated Payload LSBR",
            )
            .with_return_field(
                "lsbm_pred",
                "Prediction LSBM (PNG)",
                FieldType::Float,
                "Probability LSBM",
            )
            .with_return_field(
                "steganogan_pred",
                "Prediction SteganoGAN (PNG)",
                FieldType::Float,
                "Probability SteganoGAN",
            )
            .with_return_field(
                "uniward_pred",
                "Prediction UNIWARD (PNG)",
                FieldType::Float,
                "Probability UNIWARD",
            )
            .with_file_type("png")
            .with_file_type("jpg"),
    )
    .with_function(
        FunctionDescriptor::new(
            "effnetb0_predict",
            "Runs prediction on a pre-trained effnetb0 model.",
        )
        .with_return_field(
            "pred",
            "Prediction result.",
            FieldType::Float,
            "Probability of image containing stego payload",
        )
        .with_parameter(
            "model_name",
            "PNG:\nA-alaska2-hill\nA-alaska2-hilluniw\nA-alaska2-lsbm\nA-alaska2-lsbr\n\
             A-alaska2-steganogan\nJPG:\nA-alaska2-f5\nA-alaska2-jmipod\n\
             A-alaska2-juniw+wiener\nA-alaska2-juniw\nA-alaska2-nsf5\nA-alaska2-outguess\n\
             A-alaska2-steghide\nA-alaska2-uniw",
            false,
            FieldType::String,
        )
        .with_file_type("png")
        .with_file_type("jpg"),
    )
}
