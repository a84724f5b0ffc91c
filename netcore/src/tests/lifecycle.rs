//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 设备生命周期测试

use alloc::rc::Rc;
use core::cell::Cell;

use super::{mock_netdev, tracked};
use crate::drivers::net::space::{netdev_get, netdev_put, netdev_refcount};
use crate::errno::Errno;

#[test]
fn test_open_failure_leaves_queues_untouched() {
    let (netdev, state) = mock_netdev();
    state.borrow_mut().fail_open = Some(Errno::IOError);
    let freed = Rc::new(Cell::new(0));

    let mut dev = netdev.borrow_mut();
    dev.rx(tracked(b"early", &freed));

    assert_eq!(dev.open(), Err(Errno::IOError));
    assert!(!dev.is_open());
    assert_eq!(state.borrow().opens, 1);
    assert_eq!(dev.rx_queue_len(), 1);
    assert_eq!(freed.get(), 0);
}

#[test]
fn test_close_with_outstanding_packets() {
    let (netdev, state) = mock_netdev();
    let freed = Rc::new(Cell::new(0));
    let mut dev = netdev.borrow_mut();
    dev.open().unwrap();

    for _ in 0..3 {
        dev.transmit(tracked(b"tx", &freed)).unwrap();
    }
    for _ in 0..2 {
        dev.rx(tracked(b"rx", &freed));
    }

    dev.close();
    assert!(!dev.is_open());
    assert_eq!(dev.tx_queue_len(), 0);
    assert_eq!(dev.rx_queue_len(), 0);
    assert_eq!(dev.stats().tx_err, 3);
    assert_eq!(dev.stats().rx_err, 2);
    assert_eq!(freed.get(), 5);
    assert_eq!(state.borrow().closes, 1);

    // 再次关闭不会调用适配器
    dev.close();
    assert_eq!(state.borrow().closes, 1);
    assert_eq!(dev.stats().tx_err, 3);
}

#[test]
fn test_last_reference_drains_queues() {
    let (netdev, _state) = mock_netdev();
    let freed = Rc::new(Cell::new(0));
    {
        let mut dev = netdev.borrow_mut();
        dev.open().unwrap();
        dev.transmit(tracked(b"tx", &freed)).unwrap();
        dev.transmit(tracked(b"tx", &freed)).unwrap();
        dev.rx(tracked(b"rx", &freed));
    }

    let held = netdev_get(&netdev);
    netdev_put(netdev);
    assert_eq!(freed.get(), 0);
    assert_eq!(netdev_refcount(&held), 1);

    netdev_put(held);
    assert_eq!(freed.get(), 3);
}

#[test]
fn test_irq_forwarded_to_adapter() {
    let (netdev, state) = mock_netdev();
    let mut dev = netdev.borrow_mut();

    dev.irq(true);
    dev.irq(false);
    assert_eq!(state.borrow().irqs, alloc::vec![true, false]);
}

#[test]
fn test_poll_skipped_while_closed() {
    let (netdev, state) = mock_netdev();
    let mut dev = netdev.borrow_mut();

    dev.poll();
    assert_eq!(state.borrow().polls, 0);

    dev.open().unwrap();
    dev.poll();
    assert_eq!(state.borrow().polls, 1);
}
