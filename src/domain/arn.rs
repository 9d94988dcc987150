// ARN parsing helpers

/// Borrowed view over `arn:partition:service:region:account:resource`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arn<'a> {
    pub partition: &'a str,
    pub service: &'a str,
    pub region: &'a str,
    pub account: &'a str,
    pub resource: &'a str,
}

impl<'a> Arn<'a> {
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut parts = raw.splitn(6, ':');
        if parts.next()? != "arn" {
            return None;
        }

        let partition = parts.next()?;
        let service = parts.next()?;
        let region = parts.next()?;
        let account = parts.next()?;
        let resource = parts.next()?;

        if service.is_empty() || resource.is_empty() {
            return None;
        }

        Some(Self {
            partition,
            service,
            region,
            account,
            resource,
        })
    }

    /// Text after the last '/' of the resource part
    pub fn resource_leaf(&self) -> &'a str {
        self.resource.rsplit('/').next().unwrap_or(self.resource)
    }

    /// Slash-separated segments of the resource part
    pub fn path_segments(&self) -> Vec<&'a str> {
        self.resource.split('/').collect()
    }

    /// Segment following `prefix` up to the next ':' (e.g. `function:name:alias` -> `name`)
    pub fn segment_after(&self, prefix: &str) -> Option<&'a str> {
        let rest = self.resource.strip_prefix(prefix)?;
        let segment = rest.split(':').next()?;
        (!segment.is_empty()).then_some(segment)
    }
}
