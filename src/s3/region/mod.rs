use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// https://docs.aws.amazon.com/general/latest/gr/rande.html#regional-endpoints
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    // Asia Pacific (Tokyo)         ap-northeast-1
    ApNortheast1,

    // Asia Pacific (Singapore)     ap-southeast-1
    ApSoutheast1,

    // Asia Pacific (Sydney)        ap-southeast-2
    ApSoutheast2,

    // Canada (Central)             ca-central-1
    CaCentral1,

    // Europe (Frankfurt)           eu-central-1
    EuCentral1,

    // Europe (Zurich)              eu-central-2
    EuCentral2,

    // Europe (Stockholm)           eu-north-1
    EuNorth1,

    // Europe (Ireland)             eu-west-1
    EuWest1,

    // Europe (London)              eu-west-2
    EuWest2,

    // Europe (Paris)               eu-west-3
    EuWest3,

    // South America (São Paulo)    sa-east-1
    SaEast1,

    // US East (N. Virginia)        us-east-1
    UsEast1,

    // US East (Ohio)               us-east-2
    UsEast2,

    // US West (N. California)      us-west-1
    UsWest1,

    // US West (Oregon)             us-west-2
    UsWest2,

    // Any S3 compatible server (MinIO, Ceph, ...), endpoint is host[:port]
    Custom { name: String, endpoint: String },
}

impl Region {
    #[must_use]
    pub fn name(&self) -> &str {
        match *self {
            Self::ApNortheast1 => "ap-northeast-1",
            Self::ApSoutheast1 => "ap-southeast-1",
            Self::ApSoutheast2 => "ap-southeast-2",
            Self::CaCentral1 => "ca-central-1",
            Self::EuCentral1 => "eu-central-1",
            Self::EuCentral2 => "eu-central-2",
            Self::EuNorth1 => "eu-north-1",
            Self::EuWest1 => "eu-west-1",
            Self::EuWest2 => "eu-west-2",
            Self::EuWest3 => "eu-west-3",
            Self::SaEast1 => "sa-east-1",
            Self::UsEast1 => "us-east-1",
            Self::UsEast2 => "us-east-2",
            Self::UsWest1 => "us-west-1",
            Self::UsWest2 => "us-west-2",
            // most S3 compatible servers accept us-east-1 as the signing region
            Self::Custom { ref name, .. } => {
                if name.is_empty() {
                    "us-east-1"
                } else {
                    name
                }
            }
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        match self {
            Self::Custom { endpoint, .. } => endpoint.clone(),
            _ => format!("s3.{}.amazonaws.com", self.name()),
        }
    }
}

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: &str = &s.to_lowercase();
        match v {
            "ap-northeast-1" => Ok(Self::ApNortheast1),
            "ap-southeast-1" => Ok(Self::ApSoutheast1),
            "ap-southeast-2" => Ok(Self::ApSoutheast2),
            "ca-central-1" => Ok(Self::CaCentral1),
            "eu-central-1" => Ok(Self::EuCentral1),
            "eu-central-2" => Ok(Self::EuCentral2),
            "eu-north-1" => Ok(Self::EuNorth1),
            "eu-west-1" => Ok(Self::EuWest1),
            "eu-west-2" => Ok(Self::EuWest2),
            "eu-west-3" => Ok(Self::EuWest3),
            "sa-east-1" => Ok(Self::SaEast1),
            "us-east-1" => Ok(Self::UsEast1),
            "us-east-2" => Ok(Self::UsEast2),
            "us-west-1" => Ok(Self::UsWest1),
            "us-west-2" => Ok(Self::UsWest2),
            _ => Err(ParseRegionError::new(s)),
        }
    }
}

/// An error produced when attempting to convert a `str` into a `Region` fails.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseRegionError {
    message: String,
}

impl ParseRegionError {
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            message: format!("Not a valid AWS region: {input}"),
        }
    }
}

impl Error for ParseRegionError {}

impl Display for ParseRegionError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.message)
    }
}

impl Default for Region {
    fn default() -> Self {
        match std::env::var("AWS_DEFAULT_REGION").or_else(|_| std::env::var("AWS_REGION")) {
            Ok(ref v) => Self::from_str(v).unwrap_or(Self::UsEast1),
            Err(_) => Self::UsEast1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Region;

    #[test]
    fn from_str() {
        assert_eq!(
            "foo".parse::<Region>().map_err(|e| e.to_string()),
            Err("Not a valid AWS region: foo".to_owned())
        );
        assert_eq!("eu-central-2".parse(), Ok(Region::EuCentral2));
        assert_eq!("US-EAST-1".parse(), Ok(Region::UsEast1));
        assert_eq!("us-west-2".parse(), Ok(Region::UsWest2));
    }

    #[test]
    fn endpoint() {
        assert_eq!(Region::UsWest1.endpoint(), "s3.us-west-1.amazonaws.com");
        let custom = Region::Custom {
            name: String::new(),
            endpoint: "localhost:9000".to_string(),
        };
        assert_eq!(custom.endpoint(), "localhost:9000");
        assert_eq!(custom.name(), "us-east-1");
    }

    #[test]
    fn default_from_env() {
        temp_env::with_vars(
            [
                ("AWS_DEFAULT_REGION", Some("eu-west-3")),
                ("AWS_REGION", None::<&str>),
            ],
            || assert_eq!(Region::default(), Region::EuWest3),
        );
        temp_env::with_vars(
            [
                ("AWS_DEFAULT_REGION", None::<&str>),
                ("AWS_REGION", Some("nowhere-1")),
            ],
            || assert_eq!(Region::default(), Region::UsEast1),
        );
    }
}
