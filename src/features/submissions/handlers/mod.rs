pub mod submission_handler;
pub mod tracking_handler;

pub use submission_handler::{
    __path_create_candidature, __path_create_consultation, __path_create_contact,
    __path_create_demande_avis, __path_create_signalement, create_candidature,
    create_consultation, create_contact, create_demande_avis, create_signalement,
};
pub use tracking_handler::{__path_track_submission, track_submission};
