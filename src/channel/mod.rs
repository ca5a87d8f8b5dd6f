//! Bounded FIFO channels for communication between threads.
//!
//! A [`Channel`] is a fixed-capacity queue of items, safe for any number of
//! concurrent producer and consumer threads. Send blocks while the buffer
//! is full, receive blocks while it is empty, and [`Channel::close`] shuts
//! the channel down cooperatively: blocked senders fail, blocked receivers
//! drain whatever is still buffered and then fail.
//!
//! Capacity 0 selects rendezvous mode: there is no buffer at all, and a
//! send completes only by handing its item to a receiver that is already
//! committed to take it.
//!
//! # Example
//!
//! ```
//! use tandem::Channel;
//!
//! let ch = Channel::new(8);
//! let producer = {
//!     let ch = ch.clone();
//!     std::thread::spawn(move || {
//!         for i in 0..4 {
//!             ch.send(i).unwrap();
//!         }
//!         ch.close();
//!     })
//! };
//!
//! let mut received = Vec::new();
//! while let Ok(v) = ch.recv() {
//!     received.push(v);
//! }
//! assert_eq!(received, vec![0, 1, 2, 3]);
//! producer.join().unwrap();
//! ```

mod bounded;

pub use bounded::Channel;
