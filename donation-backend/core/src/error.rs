use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not parse receipt template, error: {source}"))]
    ParseTemplate { source: tera::Error },

    #[snafu(display("Could not render receipt template, error: {source}"))]
    RenderTemplate { source: tera::Error },
}
