// Priority job queue for the firmware main loop
// NOTE: No dynamic allocation and uses fixed-size queues
//
// Tasks only raise signals; the main loop turns them into jobs here and
// drains high before normal before low, FIFO within a tier. Touch frames
// always go out before decoder housekeeping.
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Drain queued touch frames into the input sink.
    ReportTouch,

    /// Re-read the decoder lock status and log a change of standard.
    QueryStandard,

    /// Log the full decoder register report.
    DumpDecoder,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::ReportTouch => write!(f, "ReportTouch"),
            Job::QueryStandard => write!(f, "QueryStandard"),
            Job::DumpDecoder => write!(f, "DumpDecoder"),
        }
    }
}

/// Job priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High = 0,
    Normal = 1,
    Low = 2,
}

impl Job {
    pub const fn priority(&self) -> Priority {
        match self {
            Job::ReportTouch => Priority::High,
            Job::QueryStandard => Priority::Normal,
            Job::DumpDecoder => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// Queue for this priority level is full, contains the rejected job
    Full(Job),
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::Full(job) => write!(f, "queue full, rejected {}", job),
        }
    }
}

// ring buffer for jobs
pub struct JobQueue<const N: usize> {
    buf: [Option<Job>; N],
    head: usize, // next to read
    tail: usize, // next to write
    len: usize,
}

impl<const N: usize> JobQueue<N> {
    pub const fn new() -> Self {
        Self {
            buf: [None; N],
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, job: Job) -> Result<(), Job> {
        if self.len >= N {
            return Err(job);
        }
        self.buf[self.tail] = Some(job);
        self.tail = (self.tail + 1) % N;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Job> {
        if self.len == 0 {
            return None;
        }
        let job = self.buf[self.head].take();
        self.head = (self.head + 1) % N;
        self.len -= 1;
        job
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    pub fn contains(&self, job: &Job) -> bool {
        let mut i = self.head;
        for _ in 0..self.len {
            if self.buf[i].as_ref() == Some(job) {
                return true;
            }
            i = (i + 1) % N;
        }
        false
    }

    fn push_replacing(&mut self, job: Job) {
        if self.is_full() {
            self.pop();
        }
        let _ = self.push(job);
    }

    fn push_unique(&mut self, job: Job) -> Result<(), Job> {
        if self.contains(&job) {
            return Ok(());
        }
        self.push(job)
    }
}

impl<const N: usize> Default for JobQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Scheduler {
    high: JobQueue<4>,
    normal: JobQueue<8>,
    low: JobQueue<4>,
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            high: JobQueue::new(),
            normal: JobQueue::new(),
            low: JobQueue::new(),
        }
    }

    // push a job and returns error with the job if queue is full
    pub fn push(&mut self, job: Job) -> Result<(), PushError> {
        let result = match job.priority() {
            Priority::High => self.high.push(job),
            Priority::Normal => self.normal.push(job),
            Priority::Low => self.low.push(job),
        };
        result.map_err(PushError::Full)
    }

    // push a job but if queue is full, drop the oldest job of same priority
    pub fn push_replacing(&mut self, job: Job) {
        match job.priority() {
            Priority::High => self.high.push_replacing(job),
            Priority::Normal => self.normal.push_replacing(job),
            Priority::Low => self.low.push_replacing(job),
        }
    }

    // Schedule a job only if it's not already queued (dedup that queue).
    pub fn push_unique(&mut self, job: Job) -> Result<(), PushError> {
        let result = match job.priority() {
            Priority::High => self.high.push_unique(job),
            Priority::Normal => self.normal.push_unique(job),
            Priority::Low => self.low.push_unique(job),
        };
        result.map_err(PushError::Full)
    }

    // the next job to execute
    pub fn pop(&mut self) -> Option<Job> {
        self.high
            .pop()
            .or_else(|| self.normal.pop())
            .or_else(|| self.low.pop())
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.normal.is_empty() && self.low.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.high.len() + self.normal.len() + self.low.len()
    }

    pub fn pending_by_priority(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high.len(),
            Priority::Normal => self.normal.len(),
            Priority::Low => self.low.len(),
        }
    }

    pub fn clear(&mut self) {
        self.high.clear();
        self.normal.clear();
        self.low.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_by_priority_then_fifo() {
        let mut s = Scheduler::new();
        s.push(Job::DumpDecoder).unwrap();
        s.push(Job::QueryStandard).unwrap();
        s.push(Job::ReportTouch).unwrap();
        s.push(Job::QueryStandard).unwrap();
        assert_eq!(s.pending(), 4);

        assert_eq!(s.pop(), Some(Job::ReportTouch));
        assert_eq!(s.pop(), Some(Job::QueryStandard));
        assert_eq!(s.pop(), Some(Job::QueryStandard));
        assert_eq!(s.pop(), Some(Job::DumpDecoder));
        assert_eq!(s.pop(), None);
        assert!(s.is_empty());
    }

    #[test]
    fn full_tier_rejects_with_the_job() {
        let mut s = Scheduler::new();
        for _ in 0..4 {
            s.push(Job::ReportTouch).unwrap();
        }
        assert_eq!(s.push(Job::ReportTouch), Err(PushError::Full(Job::ReportTouch)));
        // other tiers are independent
        s.push(Job::QueryStandard).unwrap();
        assert_eq!(s.pending_by_priority(Priority::High), 4);
        assert_eq!(s.pending_by_priority(Priority::Normal), 1);
    }

    #[test]
    fn unique_push_dedups_within_tier() {
        let mut s = Scheduler::new();
        s.push_unique(Job::QueryStandard).unwrap();
        s.push_unique(Job::QueryStandard).unwrap();
        s.push_unique(Job::DumpDecoder).unwrap();
        s.push(Job::DumpDecoder).unwrap();
        s.push_unique(Job::DumpDecoder).unwrap();
        assert_eq!(s.pending(), 3);
    }

    #[test]
    fn replacing_push_drops_oldest() {
        let mut s = Scheduler::new();
        for _ in 0..4 {
            s.push(Job::DumpDecoder).unwrap();
        }
        assert!(s.push(Job::DumpDecoder).is_err());
        s.push_replacing(Job::DumpDecoder);
        assert_eq!(s.pending_by_priority(Priority::Low), 4);

        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn queue_wraps_around() {
        let mut q: JobQueue<2> = JobQueue::new();
        for _ in 0..5 {
            q.push(Job::DumpDecoder).unwrap();
            assert!(q.contains(&Job::DumpDecoder));
            assert_eq!(q.pop(), Some(Job::DumpDecoder));
        }
        assert!(!q.contains(&Job::DumpDecoder));
        q.push(Job::ReportTouch).unwrap();
        q.push(Job::QueryStandard).unwrap();
        assert!(q.is_full());
        assert_eq!(q.push(Job::DumpDecoder), Err(Job::DumpDecoder));
    }
}
